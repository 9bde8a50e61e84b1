//! Academic catalog repository trait.

use super::model::{
    AcademicDepartment, AcademicFaculty, AcademicSemester, EntityId, ManagementDepartment,
};
use crate::error::Result;

/// Read-only lookups over the academic catalog.
///
/// Reference validation and the expanded account view both go through this
/// trait; nothing in the provisioning path writes to the catalog.
#[async_trait::async_trait]
pub trait AcademicRepository: Send + Sync {
    /// Finds a semester by its identity.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(_))`: Semester found
    /// - `Ok(None)`: No semester with that identity
    /// - `Err(RegistryError)`: Lookup failed
    async fn find_semester(&self, id: &EntityId) -> Result<Option<AcademicSemester>>;

    async fn find_department(&self, id: &EntityId) -> Result<Option<AcademicDepartment>>;

    async fn find_academic_faculty(&self, id: &EntityId) -> Result<Option<AcademicFaculty>>;

    async fn find_management_department(
        &self,
        id: &EntityId,
    ) -> Result<Option<ManagementDepartment>>;
}
