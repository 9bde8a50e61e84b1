//! Academic catalog domain module.
//!
//! Semesters, faculties, departments and management departments are the
//! entities profiles point at. Provisioning only ever reads them.
//!
//! # Module Structure
//!
//! - `model`: Catalog entities and their value objects
//! - `request`: Payloads for adding catalog entries
//! - `repository`: Read-only lookup trait used by reference validation

mod model;
mod repository;
mod request;

// Re-export public API
pub use model::{
    AcademicDepartment, AcademicFaculty, AcademicSemester, EntityId, ManagementDepartment, Month,
    SemesterCode, SemesterTitle, SemesterYear,
};
pub use repository::AcademicRepository;
pub use request::{NewAcademicDepartment, NewAcademicFaculty, NewAcademicSemester, NewManagementDepartment};
