//! Per-role identifier allocation.
//!
//! The next sequence is one past the suffix of the most recently created
//! account of the role. Two concurrent callers can read the same latest
//! account; the store's unique index on `external_id` rejects the loser.

use std::sync::Arc;

use registry_core::academic::AcademicSemester;
use registry_core::account::{AccountRepository, Role};
use registry_core::error::Result;
use registry_core::identifier::{ExternalId, IdentifierEncoder, Sequence};

pub struct SequenceAllocator {
    accounts: Arc<dyn AccountRepository>,
}

impl SequenceAllocator {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Returns the sequence the next account of `role` should carry.
    pub async fn next_sequence(&self, role: Role) -> Result<Sequence> {
        let current = match self.accounts.find_latest_by_role(role).await? {
            Some(latest) => IdentifierEncoder::decode(role, &latest.external_id)?,
            None => Sequence::ZERO,
        };
        let next = current.next()?;
        tracing::debug!(
            "[SequenceAllocator] {} sequence {} -> {}",
            role,
            current,
            next
        );
        Ok(next)
    }

    /// Allocates and encodes the next identifier for `role`.
    pub async fn allocate(
        &self,
        role: Role,
        semester: Option<&AcademicSemester>,
    ) -> Result<ExternalId> {
        let sequence = self.next_sequence(role).await?;
        IdentifierEncoder::encode(role, sequence, semester)
    }
}
