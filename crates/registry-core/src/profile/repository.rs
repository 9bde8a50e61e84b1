//! Profile repository trait.
//!
//! Defines committed-state reads over the profile collections.

use super::model::{Profile, ProfileId};
use crate::account::Role;
use crate::error::Result;
use crate::identifier::ExternalId;

/// Read-side access to profiles.
///
/// # Implementation Notes
///
/// Implementations must keep `external_id` unique across all profile
/// collections so that lookups by identifier are unambiguous.
#[async_trait::async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a profile by the external identifier it shares with its account.
    async fn find_by_external_id(&self, external_id: &ExternalId) -> Result<Option<Profile>>;

    /// Finds a profile by its store identity.
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>>;

    async fn count_by_role(&self, role: Role) -> Result<usize>;
}
