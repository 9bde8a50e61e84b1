//! Domain layer of the campus registry.
//!
//! Holds the account/profile model, the academic catalog, the identifier
//! encoding rules and the traits the application layer is written against.

pub mod academic;
pub mod account;
pub mod clock;
pub mod config;
pub mod credential;
pub mod error;
pub mod identifier;
pub mod profile;
pub mod transaction;

// Re-export common error type
pub use error::{ErrorResponse, RegistryError, Result};
