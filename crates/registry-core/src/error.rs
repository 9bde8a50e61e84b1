//! Error types for the registry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::Role;

/// The kind of foreign entity a profile points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceKind {
    AcademicSemester,
    AcademicDepartment,
    AcademicFaculty,
    ManagementDepartment,
}

impl ReferenceKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AcademicSemester => "academic semester",
            Self::AcademicDepartment => "academic department",
            Self::AcademicFaculty => "academic faculty",
            Self::ManagementDepartment => "management department",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A shared error type for the whole registry.
///
/// Every variant maps to a status code through [`RegistryError::status_code`],
/// so callers at the edge can build an [`ErrorResponse`] without inspecting
/// store internals.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum RegistryError {
    /// A referenced academic or management entity does not exist.
    #[error("Invalid {reference}: '{id}'")]
    InvalidReference { reference: ReferenceKind, id: String },

    /// The profile insert reported zero written documents.
    #[error("Failed to create {role}.")]
    ProfileCreation { role: Role },

    /// The account insert reported zero written documents.
    #[error("Failed to create {role} account.")]
    AccountCreation { role: Role },

    /// A unique index rejected the generated identifier.
    #[error("Duplicate identifier in {collection}: '{external_id}'")]
    DuplicateIdentifier {
        collection: &'static str,
        external_id: String,
    },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// A delete affected zero documents.
    #[error("Failed to delete {entity_type} '{id}'")]
    Deletion {
        entity_type: &'static str,
        id: String,
    },

    /// The supplied credential did not match the stored hash.
    #[error("Credential is incorrect")]
    InvalidCredentials,

    /// Malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Begin/commit/abort failure
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn invalid_reference(reference: ReferenceKind, id: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference,
            id: id.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn deletion(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Deletion {
            entity_type,
            id: id.into(),
        }
    }

    pub fn duplicate(collection: &'static str, external_id: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            collection,
            external_id: external_id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transaction(message: impl Into<String>) -> Self {
        Self::Transaction(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_duplicate_identifier(&self) -> bool {
        matches!(self, Self::DuplicateIdentifier { .. })
    }

    /// Whether repeating the same call may succeed.
    ///
    /// Only identifier collisions qualify: a retry re-runs allocation and
    /// observes the account that won the race.
    pub fn is_retryable(&self) -> bool {
        self.is_duplicate_identifier()
    }

    /// HTTP-style status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidReference { .. }
            | Self::ProfileCreation { .. }
            | Self::AccountCreation { .. }
            | Self::Validation(_) => 400,
            Self::InvalidCredentials => 401,
            Self::NotFound { .. } | Self::Deletion { .. } => 404,
            Self::DuplicateIdentifier { .. } => 409,
            Self::Transaction(_)
            | Self::DataAccess(_)
            | Self::Config(_)
            | Self::Io { .. }
            | Self::Serialization { .. }
            | Self::Internal(_) => 500,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RegistryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, RegistryError>`.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Structured failure payload handed to callers at the edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub success: bool,
    pub message: String,
}

impl From<&RegistryError> for ErrorResponse {
    fn from(err: &RegistryError) -> Self {
        let status_code = err.status_code();
        // Store and IO detail stays in the logs.
        let message = if status_code >= 500 {
            "Internal server error".to_string()
        } else {
            err.to_string()
        };
        Self {
            status_code,
            success: false,
            message,
        }
    }
}
