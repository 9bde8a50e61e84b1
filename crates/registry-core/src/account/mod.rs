//! Account domain module.
//!
//! # Module Structure
//!
//! - `model`: `Account`, `Role` and the `ProfileRef` tagged union
//! - `repository`: Read-side repository trait
//! - `view`: Denormalized view returned by provisioning and lookups

mod model;
mod repository;
mod view;

// Re-export public API
pub use model::{Account, ProfileRef, Role};
pub use repository::AccountRepository;
pub use view::{AccountView, ExpandedAdmin, ExpandedFaculty, ExpandedProfile, ExpandedStudent};
