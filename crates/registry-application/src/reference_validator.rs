//! Reference validation for profile payloads.
//!
//! Every catalog entity a profile points at must exist before anything is
//! written. Checks run in a fixed order (semester, department, faculty,
//! management department) and stop at the first missing entity.

use std::sync::Arc;

use registry_core::academic::{AcademicRepository, AcademicSemester, EntityId};
use registry_core::error::{ReferenceKind, RegistryError, Result};
use registry_core::profile::{ProfileDetails, ProfilePatch};

pub struct ReferenceValidator {
    academic: Arc<dyn AcademicRepository>,
}

impl ReferenceValidator {
    pub fn new(academic: Arc<dyn AcademicRepository>) -> Self {
        Self { academic }
    }

    /// Checks every reference the role requires.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(semester))`: Student payload; the admission semester
    /// - `Ok(None)`: Faculty or admin payload
    /// - `Err(RegistryError::InvalidReference)`: First missing reference
    pub async fn validate(&self, details: &ProfileDetails) -> Result<Option<AcademicSemester>> {
        self.check_all(details.references()).await
    }

    /// Checks only the references a patch actually changes.
    pub async fn validate_patch(&self, patch: &ProfilePatch) -> Result<()> {
        self.check_all(patch.references()).await?;
        Ok(())
    }

    async fn check_all(
        &self,
        references: Vec<(ReferenceKind, &EntityId)>,
    ) -> Result<Option<AcademicSemester>> {
        let mut semester = None;
        for (kind, id) in references {
            let found = match kind {
                ReferenceKind::AcademicSemester => {
                    semester = self.academic.find_semester(id).await?;
                    semester.is_some()
                }
                ReferenceKind::AcademicDepartment => {
                    self.academic.find_department(id).await?.is_some()
                }
                ReferenceKind::AcademicFaculty => {
                    self.academic.find_academic_faculty(id).await?.is_some()
                }
                ReferenceKind::ManagementDepartment => self
                    .academic
                    .find_management_department(id)
                    .await?
                    .is_some(),
            };
            if !found {
                tracing::debug!("[ReferenceValidator] Missing {} '{}'", kind, id);
                return Err(RegistryError::invalid_reference(kind, id.as_str()));
            }
        }
        Ok(semester)
    }
}
