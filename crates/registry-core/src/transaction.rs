//! Multi-document transactions.
//!
//! A [`StoreTransaction`] buffers writes to the profile and account
//! collections; nothing it does is visible to other callers until
//! [`StoreTransaction::commit`] succeeds. Each transaction is owned by a
//! single call and is never shared between tasks.

use async_trait::async_trait;

use crate::account::Account;
use crate::error::Result;
use crate::identifier::ExternalId;
use crate::profile::{NewProfile, Profile};

/// A store able to open multi-document transactions.
#[async_trait]
pub trait TransactionalStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>>;
}

/// An open transaction.
///
/// Unique indexes on `external_id` are enforced both when a document is
/// inserted and again at commit, so two transactions racing for the same
/// identifier cannot both commit.
///
/// Dropping a transaction without calling `commit` or `abort` discards its
/// buffered writes.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Inserts a profile and assigns its identity.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Profile))`: The written document
    /// - `Ok(None)`: Nothing was written
    /// - `Err(RegistryError::DuplicateIdentifier)`: `external_id` is taken
    async fn insert_profile(&mut self, profile: NewProfile) -> Result<Option<Profile>>;

    /// Inserts an account.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Account))`: The written document
    /// - `Ok(None)`: Nothing was written
    /// - `Err(RegistryError::DuplicateIdentifier)`: `external_id` is taken
    async fn insert_account(&mut self, account: Account) -> Result<Option<Account>>;

    /// Replaces the profile with the same identity. `Ok(None)` if absent.
    async fn replace_profile(&mut self, profile: Profile) -> Result<Option<Profile>>;

    /// Replaces the account with the same external identifier. `Ok(None)` if absent.
    async fn replace_account(&mut self, account: Account) -> Result<Option<Account>>;

    /// Deletes the profile carrying `external_id` and returns it.
    async fn delete_profile(&mut self, external_id: &ExternalId) -> Result<Option<Profile>>;

    /// Deletes accounts carrying `external_id`; returns how many were removed.
    async fn delete_account(&mut self, external_id: &ExternalId) -> Result<u64>;

    async fn commit(self: Box<Self>) -> Result<()>;

    async fn abort(self: Box<Self>) -> Result<()>;
}

/// Commits `tx` when `outcome` is `Ok`, aborts it otherwise.
///
/// The transaction is released on every path. When aborting, the original
/// error is returned unchanged; a failure of the abort itself is only logged.
pub async fn finish<T>(tx: Box<dyn StoreTransaction>, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            tracing::warn!("[Transaction] Aborting: {}", err);
            if let Err(abort_err) = tx.abort().await {
                tracing::error!("[Transaction] Abort failed: {}", abort_err);
            }
            Err(err)
        }
    }
}
