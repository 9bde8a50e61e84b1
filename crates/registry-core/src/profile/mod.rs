//! Profile domain module.
//!
//! # Module Structure
//!
//! - `model`: `Profile`, `ProfileDetails` and per-role attribute structs
//! - `request`: Provisioning payloads and partial updates
//! - `repository`: Read-side repository trait

mod model;
mod repository;
mod request;

// Re-export public API
pub use model::{
    AdminDetails, FacultyDetails, Gender, PersonName, PersonalInfo, Profile, ProfileDetails,
    ProfileId, StudentDetails,
};
pub use repository::ProfileRepository;
pub use request::{
    AccountPayload, AdminPatch, FacultyPatch, NewProfile, PersonNamePatch, PersonalInfoPatch,
    ProfilePatch, StudentPatch,
};
