//! Account domain model.
//!
//! An account is the addressable identity record: role, credential hash and
//! the generated external identifier. It owns exactly one profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credential::CredentialHash;
use crate::error::{RegistryError, Result};
use crate::identifier::{ExternalId, IdentifierEncoder};
use crate::profile::ProfileId;

/// Role an account is provisioned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Faculty, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "faculty" => Ok(Self::Faculty),
            "admin" => Ok(Self::Admin),
            other => Err(RegistryError::validation(format!("unknown role '{}'", other))),
        }
    }
}

/// Link from an account to the one profile it owns.
///
/// The variant is the profile collection; an account can never point at two
/// profiles at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum ProfileRef {
    Student(ProfileId),
    Faculty(ProfileId),
    Admin(ProfileId),
}

impl ProfileRef {
    pub fn new(role: Role, id: ProfileId) -> Self {
        match role {
            Role::Student => Self::Student(id),
            Role::Faculty => Self::Faculty(id),
            Role::Admin => Self::Admin(id),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Student(_) => Role::Student,
            Self::Faculty(_) => Role::Faculty,
            Self::Admin(_) => Role::Admin,
        }
    }

    pub fn id(&self) -> &ProfileId {
        match self {
            Self::Student(id) | Self::Faculty(id) | Self::Admin(id) => id,
        }
    }
}

/// Authentication-facing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub external_id: ExternalId,
    pub role: Role,
    pub credential_hash: CredentialHash,
    pub requires_credential_reset: bool,
    pub credential_changed_at: Option<DateTime<Utc>>,
    pub profile_ref: ProfileRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Checks the structural invariants every stored account must satisfy.
    ///
    /// - the profile reference points into the collection of `role`
    /// - the external identifier has the shape of `role`
    pub fn check_invariants(&self) -> Result<()> {
        if self.profile_ref.role() != self.role {
            return Err(RegistryError::internal(format!(
                "account '{}' has role {} but references a {} profile",
                self.external_id,
                self.role,
                self.profile_ref.role()
            )));
        }
        IdentifierEncoder::decode(self.role, &self.external_id)?;
        Ok(())
    }
}
