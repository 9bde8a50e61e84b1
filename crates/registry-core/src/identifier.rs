//! Role-encoded external identifiers.
//!
//! Every account and its profile share one human-facing identifier whose
//! shape depends on the role:
//!
//! ```text
//! student  {yy}{code}{nnnnn}   e.g. 240200001
//! faculty  F-{nnnnn}           e.g. F-00007
//! admin    A-{nnnnn}           e.g. A-00012
//! ```
//!
//! Encoding is a pure function; allocation of the sequence number lives in
//! the application layer.

use serde::{Deserialize, Serialize};

use crate::academic::AcademicSemester;
use crate::account::Role;
use crate::error::{RegistryError, Result};

/// Width of the zero-padded sequence segment.
pub const SEQUENCE_WIDTH: usize = 5;

/// Length of the `{yy}{code}` segment of a student identifier.
const STUDENT_PREFIX_LEN: usize = 4;

const FACULTY_PREFIX: &str = "F-";
const ADMIN_PREFIX: &str = "A-";

/// Human-facing identifier shared by an account and its profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(String);

impl ExternalId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExternalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExternalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Per-role sequence number. Zero means "nothing allocated yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Sequence(u32);

impl Sequence {
    pub const ZERO: Sequence = Sequence(0);

    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> Result<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| RegistryError::internal("sequence space exhausted"))
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0width$}", self.0, width = SEQUENCE_WIDTH)
    }
}

/// Formats and parses role-encoded identifiers.
pub struct IdentifierEncoder;

impl IdentifierEncoder {
    /// Builds the canonical identifier for `role` and `sequence`.
    ///
    /// Students need their admission semester; the other roles ignore it.
    pub fn encode(
        role: Role,
        sequence: Sequence,
        semester: Option<&AcademicSemester>,
    ) -> Result<ExternalId> {
        let encoded = match role {
            Role::Student => {
                let semester = semester.ok_or_else(|| {
                    RegistryError::internal("student identifiers require a semester")
                })?;
                format!(
                    "{}{}{}",
                    semester.year.short(),
                    semester.code.as_str(),
                    sequence
                )
            }
            Role::Faculty => format!("{}{}", FACULTY_PREFIX, sequence),
            Role::Admin => format!("{}{}", ADMIN_PREFIX, sequence),
        };
        Ok(ExternalId(encoded))
    }

    /// Extracts the sequence number from an identifier of the given role.
    pub fn decode(role: Role, external_id: &ExternalId) -> Result<Sequence> {
        let raw = external_id.as_str();
        let suffix = match role {
            Role::Student => raw.get(STUDENT_PREFIX_LEN..),
            Role::Faculty => raw.strip_prefix(FACULTY_PREFIX),
            Role::Admin => raw.strip_prefix(ADMIN_PREFIX),
        };

        suffix
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u32>().ok())
            .map(Sequence)
            .ok_or_else(|| {
                RegistryError::internal(format!(
                    "malformed {} identifier '{}'",
                    role, external_id
                ))
            })
    }
}
