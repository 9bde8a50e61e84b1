//! Credential hashing service trait.
//!
//! The hashing algorithm is a collaborator; provisioning only needs to turn a
//! plaintext secret into an opaque hash and to verify one later.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A plaintext credential secret.
///
/// Never printed: `Debug` is redacted and the type does not implement
/// `Serialize`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(**redacted**)")
    }
}

/// Opaque stored hash of a secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHash(String);

impl CredentialHash {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialHash(**redacted**)")
    }
}

/// Service for hashing and verifying credential secrets.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Secrets are never logged or exposed in error messages
/// - Two hashes of the same secret differ (salted)
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, secret: &Secret) -> Result<CredentialHash>;

    /// Returns `Ok(false)` on mismatch; `Err` only for unreadable hashes.
    fn verify(&self, secret: &Secret, hash: &CredentialHash) -> Result<bool>;
}
