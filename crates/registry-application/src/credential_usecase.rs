//! Credential verification and change.

use std::sync::Arc;

use serde::Serialize;

use registry_core::account::{Account, AccountRepository, Role};
use registry_core::clock::Clock;
use registry_core::credential::{CredentialHasher, Secret};
use registry_core::error::{RegistryError, Result};
use registry_core::identifier::ExternalId;
use registry_core::transaction::{self, TransactionalStore};

use crate::services::RegistryServices;

/// Outcome of a successful credential check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialCheck {
    pub external_id: ExternalId,
    pub role: Role,
    pub requires_credential_reset: bool,
}

impl From<&Account> for CredentialCheck {
    fn from(account: &Account) -> Self {
        Self {
            external_id: account.external_id.clone(),
            role: account.role,
            requires_credential_reset: account.requires_credential_reset,
        }
    }
}

pub struct CredentialUseCase {
    accounts: Arc<dyn AccountRepository>,
    store: Arc<dyn TransactionalStore>,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
}

impl CredentialUseCase {
    pub fn new(services: &RegistryServices) -> Self {
        Self {
            accounts: services.accounts.clone(),
            store: services.store.clone(),
            hasher: services.hasher.clone(),
            clock: services.clock.clone(),
        }
    }

    /// Checks `secret` against the stored hash of `external_id`.
    pub async fn verify(&self, external_id: &ExternalId, secret: &Secret) -> Result<CredentialCheck> {
        let account = self.authenticate(external_id, secret).await?;
        Ok(CredentialCheck::from(&account))
    }

    /// Replaces the credential after checking the current one.
    ///
    /// Clears the reset flag and stamps the change time.
    pub async fn change(
        &self,
        external_id: &ExternalId,
        current: &Secret,
        replacement: &Secret,
    ) -> Result<CredentialCheck> {
        if replacement.is_empty() {
            return Err(RegistryError::validation("new credential cannot be empty"));
        }

        let mut account = self.authenticate(external_id, current).await?;
        let now = self.clock.now();
        account.credential_hash = self.hasher.hash(replacement)?;
        account.requires_credential_reset = false;
        account.credential_changed_at = Some(now);
        account.updated_at = now;

        let mut tx = self.store.begin().await?;
        let outcome = tx.replace_account(account).await.and_then(|replaced| {
            replaced.ok_or_else(|| RegistryError::not_found("account", external_id.as_str()))
        });
        let updated = transaction::finish(tx, outcome).await?;

        tracing::info!("[Credentials] Credential changed for {}", external_id);
        Ok(CredentialCheck::from(&updated))
    }

    async fn authenticate(&self, external_id: &ExternalId, secret: &Secret) -> Result<Account> {
        let account = self
            .accounts
            .find_by_external_id(external_id)
            .await?
            .ok_or_else(|| RegistryError::not_found("account", external_id.as_str()))?;

        if !self.hasher.verify(secret, &account.credential_hash)? {
            tracing::warn!("[Credentials] Rejected credential for {}", external_id);
            return Err(RegistryError::InvalidCredentials);
        }
        Ok(account)
    }
}
