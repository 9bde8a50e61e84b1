//! Profile domain model.
//!
//! Represents the role-specific record (student, faculty or admin) owned by
//! an account, together with the catalog entities it points at.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::academic::EntityId;
use crate::account::Role;
use crate::error::ReferenceKind;
use crate::identifier::ExternalId;

/// Store-generated identity of a profile document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Attributes every profile kind carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: PersonName,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    pub email: String,
    pub contact_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    pub personal: PersonalInfo,
    pub academic_semester: EntityId,
    pub academic_department: EntityId,
    pub academic_faculty: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyDetails {
    pub personal: PersonalInfo,
    pub designation: String,
    pub academic_department: EntityId,
    pub academic_faculty: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDetails {
    pub personal: PersonalInfo,
    pub designation: String,
    pub management_department: EntityId,
}

/// Role-specific profile payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ProfileDetails {
    Student(StudentDetails),
    Faculty(FacultyDetails),
    Admin(AdminDetails),
}

impl ProfileDetails {
    pub fn role(&self) -> Role {
        match self {
            Self::Student(_) => Role::Student,
            Self::Faculty(_) => Role::Faculty,
            Self::Admin(_) => Role::Admin,
        }
    }

    pub fn personal(&self) -> &PersonalInfo {
        match self {
            Self::Student(d) => &d.personal,
            Self::Faculty(d) => &d.personal,
            Self::Admin(d) => &d.personal,
        }
    }

    pub fn personal_mut(&mut self) -> &mut PersonalInfo {
        match self {
            Self::Student(d) => &mut d.personal,
            Self::Faculty(d) => &mut d.personal,
            Self::Admin(d) => &mut d.personal,
        }
    }

    /// Semester a student was admitted in; `None` for other roles.
    pub fn semester(&self) -> Option<&EntityId> {
        match self {
            Self::Student(d) => Some(&d.academic_semester),
            _ => None,
        }
    }

    /// Catalog references this profile requires, in validation order.
    pub fn references(&self) -> Vec<(ReferenceKind, &EntityId)> {
        match self {
            Self::Student(d) => vec![
                (ReferenceKind::AcademicSemester, &d.academic_semester),
                (ReferenceKind::AcademicDepartment, &d.academic_department),
                (ReferenceKind::AcademicFaculty, &d.academic_faculty),
            ],
            Self::Faculty(d) => vec![
                (ReferenceKind::AcademicDepartment, &d.academic_department),
                (ReferenceKind::AcademicFaculty, &d.academic_faculty),
            ],
            Self::Admin(d) => vec![(
                ReferenceKind::ManagementDepartment,
                &d.management_department,
            )],
        }
    }
}

/// A stored profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub external_id: ExternalId,
    pub details: ProfileDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn role(&self) -> Role {
        self.details.role()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personal() -> PersonalInfo {
        PersonalInfo {
            name: PersonName {
                first_name: "Grace".to_string(),
                middle_name: None,
                last_name: "Hopper".to_string(),
            },
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 9),
            email: "grace@example.edu".to_string(),
            contact_no: "0123".to_string(),
            emergency_contact_no: None,
            blood_group: Some("O+".to_string()),
            present_address: None,
            permanent_address: None,
        }
    }

    #[test]
    fn test_student_references_in_order() {
        let details = ProfileDetails::Student(StudentDetails {
            personal: personal(),
            academic_semester: EntityId::new("sem"),
            academic_department: EntityId::new("dep"),
            academic_faculty: EntityId::new("fac"),
        });
        let kinds: Vec<ReferenceKind> = details.references().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                ReferenceKind::AcademicSemester,
                ReferenceKind::AcademicDepartment,
                ReferenceKind::AcademicFaculty
            ]
        );
        assert_eq!(details.semester(), Some(&EntityId::new("sem")));
        assert_eq!(details.role(), Role::Student);
    }

    #[test]
    fn test_admin_requires_only_management_department() {
        let details = ProfileDetails::Admin(AdminDetails {
            personal: personal(),
            designation: "Registrar".to_string(),
            management_department: EntityId::new("mgmt"),
        });
        let refs = details.references();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].0, ReferenceKind::ManagementDepartment);
        assert!(details.semester().is_none());
    }

    #[test]
    fn test_details_deserialize_from_tagged_json() {
        let json = serde_json::json!({
            "role": "faculty",
            "personal": {
                "name": { "firstName": "Alan", "lastName": "Turing" },
                "gender": "male",
                "email": "alan@example.edu",
                "contactNo": "0456"
            },
            "designation": "Lecturer",
            "academicDepartment": "dep-1",
            "academicFaculty": "fac-1"
        });
        let details: ProfileDetails = serde_json::from_value(json).unwrap();
        assert_eq!(details.role(), Role::Faculty);
        assert_eq!(details.personal().name.last_name, "Turing");
        assert!(details.personal().date_of_birth.is_none());
    }
}
