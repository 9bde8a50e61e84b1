//! Deprovisioning use case.

use std::sync::Arc;

use registry_core::account::Role;
use registry_core::error::{RegistryError, Result};
use registry_core::identifier::ExternalId;
use registry_core::profile::{Profile, ProfileRepository};
use registry_core::transaction::{self, StoreTransaction, TransactionalStore};

use crate::services::RegistryServices;

/// Removes a profile and the account linked to it in one transaction.
pub struct DeprovisioningUseCase {
    profiles: Arc<dyn ProfileRepository>,
    store: Arc<dyn TransactionalStore>,
}

impl DeprovisioningUseCase {
    pub fn new(services: &RegistryServices) -> Self {
        Self {
            profiles: services.profiles.clone(),
            store: services.store.clone(),
        }
    }

    /// Deletes the profile carrying `external_id` and its account.
    ///
    /// # Returns
    ///
    /// - `Ok(Profile)`: The deleted profile as it was stored
    /// - `Err(RegistryError::NotFound)`: No such profile; nothing was written
    /// - `Err(RegistryError::Deletion)`: The profile vanished before the delete
    pub async fn deprovision(&self, external_id: &ExternalId) -> Result<Profile> {
        let existing = self
            .profiles
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| RegistryError::not_found("profile", external_id.as_str()))?;

        let mut tx = self.store.begin().await?;
        let outcome = Self::delete_documents(tx.as_mut(), existing.role(), external_id).await;
        let deleted = transaction::finish(tx, outcome).await?;

        tracing::info!(
            "[Deprovisioning] Removed {} {}",
            deleted.role(),
            deleted.external_id
        );
        Ok(deleted)
    }

    async fn delete_documents(
        tx: &mut dyn StoreTransaction,
        role: Role,
        external_id: &ExternalId,
    ) -> Result<Profile> {
        let profile = tx
            .delete_profile(external_id)
            .await?
            .ok_or_else(|| RegistryError::deletion(role.as_str(), external_id.as_str()))?;

        if tx.delete_account(external_id).await? == 0 {
            tracing::warn!(
                "[Deprovisioning] Profile {} had no linked account",
                external_id
            );
        }
        Ok(profile)
    }
}
