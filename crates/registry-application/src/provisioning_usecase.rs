//! Provisioning use case.
//!
//! Creates a profile and its account as one atomic unit. References are
//! validated before the transaction opens; identifier allocation, profile
//! insert and account insert all happen inside it. Any failure inside the
//! transaction aborts it and surfaces the original error.

use std::sync::Arc;

use registry_core::academic::AcademicSemester;
use registry_core::account::{Account, AccountView, ProfileRef};
use registry_core::clock::Clock;
use registry_core::config::{CredentialDefaults, ProvisioningSettings};
use registry_core::credential::{CredentialHasher, Secret};
use registry_core::error::{RegistryError, Result};
use registry_core::identifier::ExternalId;
use registry_core::profile::{AccountPayload, NewProfile, ProfileDetails};
use registry_core::transaction::{self, StoreTransaction, TransactionalStore};

use crate::queries::RegistryQueries;
use crate::reference_validator::ReferenceValidator;
use crate::sequence_allocator::SequenceAllocator;
use crate::services::RegistryServices;

/// Use case for provisioning students, faculty and admins.
///
/// # Responsibilities
///
/// - Substituting the role's default secret when none is supplied
/// - Rejecting payloads with missing catalog references before any write
/// - Allocating the role-encoded identifier shared by profile and account
/// - Writing both documents in one transaction
/// - Returning the expanded view of the new account
pub struct ProvisioningUseCase {
    validator: ReferenceValidator,
    allocator: SequenceAllocator,
    queries: RegistryQueries,
    store: Arc<dyn TransactionalStore>,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
    credentials: CredentialDefaults,
    identifier_attempts: u32,
}

/// Account fields resolved from the request before the transaction opens.
struct AccountPlan {
    secret: Secret,
    requires_credential_reset: bool,
}

impl ProvisioningUseCase {
    pub fn new(
        services: &RegistryServices,
        credentials: CredentialDefaults,
        settings: &ProvisioningSettings,
    ) -> Self {
        Self {
            validator: ReferenceValidator::new(services.academic.clone()),
            allocator: SequenceAllocator::new(services.accounts.clone()),
            queries: RegistryQueries::new(services),
            store: services.store.clone(),
            hasher: services.hasher.clone(),
            clock: services.clock.clone(),
            credentials,
            identifier_attempts: settings.identifier_attempts.max(1),
        }
    }

    /// Provisions a profile of the role carried by `details`, plus its account.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(view))`: Both documents committed; the expanded account
    /// - `Ok(None)`: Both documents committed, but the follow-up read failed
    /// - `Err(_)`: Nothing was written
    pub async fn provision(
        &self,
        details: ProfileDetails,
        account: AccountPayload,
    ) -> Result<Option<AccountView>> {
        let role = details.role();
        let plan = AccountPlan {
            secret: match account.credential_secret {
                Some(secret) if !secret.is_empty() => secret,
                _ => self.credentials.secret_for(role),
            },
            requires_credential_reset: account.requires_credential_reset.unwrap_or(true),
        };

        let semester = self.validator.validate(&details).await?;

        let mut attempt = 1;
        let created = loop {
            match self.provision_once(&details, &plan, semester.as_ref()).await {
                Err(e) if e.is_retryable() && attempt < self.identifier_attempts => {
                    tracing::warn!(
                        "[Provisioning] Attempt {}/{} for {} lost an identifier race: {}",
                        attempt,
                        self.identifier_attempts,
                        role,
                        e
                    );
                    attempt += 1;
                }
                outcome => break outcome?,
            }
        };

        tracing::info!("[Provisioning] Provisioned {} {}", role, created.external_id);
        Ok(self.reread(&created.external_id).await)
    }

    async fn provision_once(
        &self,
        details: &ProfileDetails,
        plan: &AccountPlan,
        semester: Option<&AcademicSemester>,
    ) -> Result<Account> {
        let mut tx = self.store.begin().await?;
        let outcome = self
            .write_documents(tx.as_mut(), details, plan, semester)
            .await;
        transaction::finish(tx, outcome).await
    }

    async fn write_documents(
        &self,
        tx: &mut dyn StoreTransaction,
        details: &ProfileDetails,
        plan: &AccountPlan,
        semester: Option<&AcademicSemester>,
    ) -> Result<Account> {
        let role = details.role();
        let external_id = self.allocator.allocate(role, semester).await?;
        let now = self.clock.now();

        let profile = tx
            .insert_profile(NewProfile {
                external_id: external_id.clone(),
                details: details.clone(),
                created_at: now,
            })
            .await?
            .ok_or(RegistryError::ProfileCreation { role })?;

        let account = Account {
            external_id,
            role,
            credential_hash: self.hasher.hash(&plan.secret)?,
            requires_credential_reset: plan.requires_credential_reset,
            credential_changed_at: (!plan.requires_credential_reset).then_some(now),
            profile_ref: ProfileRef::new(role, profile.id),
            created_at: now,
            updated_at: now,
        };

        tx.insert_account(account)
            .await?
            .ok_or(RegistryError::AccountCreation { role })
    }

    async fn reread(&self, external_id: &ExternalId) -> Option<AccountView> {
        match self.queries.account_view(external_id).await {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::warn!(
                    "[Provisioning] Committed {} but could not read it back: {}",
                    external_id,
                    e
                );
                None
            }
        }
    }
}
