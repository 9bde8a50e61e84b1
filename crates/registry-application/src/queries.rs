//! Read-side lookups that join accounts, profiles and the catalog.

use std::sync::Arc;

use registry_core::academic::AcademicRepository;
use registry_core::account::{
    AccountRepository, AccountView, ExpandedAdmin, ExpandedFaculty, ExpandedProfile,
    ExpandedStudent,
};
use registry_core::error::{RegistryError, Result};
use registry_core::identifier::ExternalId;
use registry_core::profile::{Profile, ProfileDetails, ProfileRepository};

use crate::services::RegistryServices;

pub struct RegistryQueries {
    academic: Arc<dyn AcademicRepository>,
    accounts: Arc<dyn AccountRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl RegistryQueries {
    pub fn new(services: &RegistryServices) -> Self {
        Self {
            academic: services.academic.clone(),
            accounts: services.accounts.clone(),
            profiles: services.profiles.clone(),
        }
    }

    /// Loads an account with its profile and the profile's catalog entries.
    ///
    /// A dangling profile link yields a view whose `profile` is `None`.
    pub async fn account_view(&self, external_id: &ExternalId) -> Result<AccountView> {
        let account = self
            .accounts
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| RegistryError::not_found("account", external_id.as_str()))?;

        let profile = match self.profiles.find_by_id(account.profile_ref.id()).await? {
            Some(profile) => Some(self.expand(profile).await?),
            None => {
                tracing::warn!(
                    "[RegistryQueries] Account {} references a missing profile",
                    external_id
                );
                None
            }
        };

        Ok(AccountView::new(&account, profile))
    }

    pub async fn profile(&self, external_id: &ExternalId) -> Result<Profile> {
        self.profiles
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| RegistryError::not_found("profile", external_id.as_str()))
    }

    /// Resolves every catalog reference of `profile`.
    pub async fn expand(&self, profile: Profile) -> Result<ExpandedProfile> {
        let expanded = match profile.details {
            ProfileDetails::Student(details) => ExpandedProfile::Student(ExpandedStudent {
                id: profile.id,
                external_id: profile.external_id,
                personal: details.personal,
                academic_semester: self.academic.find_semester(&details.academic_semester).await?,
                academic_department: self
                    .academic
                    .find_department(&details.academic_department)
                    .await?,
                academic_faculty: self
                    .academic
                    .find_academic_faculty(&details.academic_faculty)
                    .await?,
            }),
            ProfileDetails::Faculty(details) => ExpandedProfile::Faculty(ExpandedFaculty {
                id: profile.id,
                external_id: profile.external_id,
                personal: details.personal,
                designation: details.designation,
                academic_department: self
                    .academic
                    .find_department(&details.academic_department)
                    .await?,
                academic_faculty: self
                    .academic
                    .find_academic_faculty(&details.academic_faculty)
                    .await?,
            }),
            ProfileDetails::Admin(details) => ExpandedProfile::Admin(ExpandedAdmin {
                id: profile.id,
                external_id: profile.external_id,
                personal: details.personal,
                designation: details.designation,
                management_department: self
                    .academic
                    .find_management_department(&details.management_department)
                    .await?,
            }),
        };
        Ok(expanded)
    }
}
