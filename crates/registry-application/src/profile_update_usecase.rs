//! Partial profile updates.

use std::sync::Arc;

use registry_core::clock::Clock;
use registry_core::error::{RegistryError, Result};
use registry_core::identifier::ExternalId;
use registry_core::profile::{Profile, ProfilePatch, ProfileRepository};
use registry_core::transaction::{self, TransactionalStore};

use crate::reference_validator::ReferenceValidator;
use crate::services::RegistryServices;

pub struct ProfileUpdateUseCase {
    validator: ReferenceValidator,
    profiles: Arc<dyn ProfileRepository>,
    store: Arc<dyn TransactionalStore>,
    clock: Arc<dyn Clock>,
}

impl ProfileUpdateUseCase {
    pub fn new(services: &RegistryServices) -> Self {
        Self {
            validator: ReferenceValidator::new(services.academic.clone()),
            profiles: services.profiles.clone(),
            store: services.store.clone(),
            clock: services.clock.clone(),
        }
    }

    /// Merges `patch` into the profile carrying `external_id`.
    ///
    /// Only references present in the patch are validated. The identifier
    /// and the owning account are never touched.
    pub async fn update(&self, external_id: &ExternalId, patch: ProfilePatch) -> Result<Profile> {
        let mut profile = self
            .profiles
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| RegistryError::not_found("profile", external_id.as_str()))?;

        if patch.role() != profile.role() {
            return Err(RegistryError::validation(format!(
                "'{}' is a {} profile, not a {} profile",
                external_id,
                profile.role(),
                patch.role()
            )));
        }

        self.validator.validate_patch(&patch).await?;
        patch.apply(&mut profile, self.clock.now())?;

        let mut tx = self.store.begin().await?;
        let outcome = tx.replace_profile(profile).await.and_then(|replaced| {
            replaced.ok_or_else(|| RegistryError::not_found("profile", external_id.as_str()))
        });
        let updated = transaction::finish(tx, outcome).await?;

        tracing::info!("[ProfileUpdate] Updated {} {}", updated.role(), external_id);
        Ok(updated)
    }
}
