//! Account repository trait.

use super::model::{Account, Role};
use crate::error::Result;
use crate::identifier::ExternalId;

/// Committed-state reads over the account collection.
///
/// Writes only happen inside a [`crate::transaction::StoreTransaction`].
#[async_trait::async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds an account by its external identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Account))`: Account found
    /// - `Ok(None)`: Account not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_external_id(&self, external_id: &ExternalId) -> Result<Option<Account>>;

    /// Returns the most recently created account of `role`.
    ///
    /// Accounts created at the same instant are ordered by insertion.
    async fn find_latest_by_role(&self, role: Role) -> Result<Option<Account>>;

    async fn count_by_role(&self, role: Role) -> Result<usize>;
}
