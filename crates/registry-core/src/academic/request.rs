//! Payloads for adding catalog entries.

use serde::{Deserialize, Serialize};

use super::model::{
    AcademicDepartment, AcademicFaculty, AcademicSemester, EntityId, ManagementDepartment, Month,
    SemesterCode, SemesterTitle, SemesterYear,
};
use crate::error::{RegistryError, Result};

/// Request to add a semester to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAcademicSemester {
    pub title: SemesterTitle,
    pub year: SemesterYear,
    pub code: SemesterCode,
    pub start_month: Month,
    pub end_month: Month,
}

impl NewAcademicSemester {
    /// The code must be the one bound to the title.
    pub fn validate(&self) -> Result<()> {
        if self.title.code() != self.code {
            return Err(RegistryError::validation(format!(
                "semester {:?} must use code {}, got {}",
                self.title,
                self.title.code().as_str(),
                self.code.as_str()
            )));
        }
        Ok(())
    }

    pub fn into_semester(self, id: EntityId) -> AcademicSemester {
        AcademicSemester {
            id,
            title: self.title,
            year: self.year,
            code: self.code,
            start_month: self.start_month,
            end_month: self.end_month,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAcademicFaculty {
    pub title: String,
}

impl NewAcademicFaculty {
    pub fn validate(&self) -> Result<()> {
        require_title(&self.title)
    }

    pub fn into_faculty(self, id: EntityId) -> AcademicFaculty {
        AcademicFaculty {
            id,
            title: self.title,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAcademicDepartment {
    pub title: String,
    pub academic_faculty: EntityId,
}

impl NewAcademicDepartment {
    pub fn validate(&self) -> Result<()> {
        require_title(&self.title)
    }

    pub fn into_department(self, id: EntityId) -> AcademicDepartment {
        AcademicDepartment {
            id,
            title: self.title,
            academic_faculty: self.academic_faculty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewManagementDepartment {
    pub title: String,
}

impl NewManagementDepartment {
    pub fn validate(&self) -> Result<()> {
        require_title(&self.title)
    }

    pub fn into_management_department(self, id: EntityId) -> ManagementDepartment {
        ManagementDepartment {
            id,
            title: self.title,
        }
    }
}

fn require_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(RegistryError::validation(
            "Title is required and cannot be empty",
        ));
    }
    Ok(())
}
