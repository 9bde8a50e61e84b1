//! Provisioning and update request models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Gender, PersonalInfo, Profile, ProfileDetails};
use crate::academic::EntityId;
use crate::account::Role;
use crate::credential::Secret;
use crate::error::{ReferenceKind, RegistryError, Result};
use crate::identifier::ExternalId;

/// Account half of a provisioning request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPayload {
    /// Falls back to the role's configured default when absent.
    #[serde(default)]
    pub credential_secret: Option<Secret>,
    /// Defaults to `true`.
    #[serde(default)]
    pub requires_credential_reset: Option<bool>,
}

/// A profile ready to be inserted; the store assigns its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub external_id: ExternalId,
    pub details: ProfileDetails,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonNamePatch {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
}

/// Field-by-field update of [`PersonalInfo`]; absent fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoPatch {
    pub name: Option<PersonNamePatch>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub contact_no: Option<String>,
    pub emergency_contact_no: Option<String>,
    pub blood_group: Option<String>,
    pub present_address: Option<String>,
    pub permanent_address: Option<String>,
}

impl PersonalInfoPatch {
    pub fn apply(self, info: &mut PersonalInfo) {
        if let Some(name) = self.name {
            if let Some(first) = name.first_name {
                info.name.first_name = first;
            }
            if name.middle_name.is_some() {
                info.name.middle_name = name.middle_name;
            }
            if let Some(last) = name.last_name {
                info.name.last_name = last;
            }
        }
        if let Some(gender) = self.gender {
            info.gender = gender;
        }
        if self.date_of_birth.is_some() {
            info.date_of_birth = self.date_of_birth;
        }
        if let Some(email) = self.email {
            info.email = email;
        }
        if let Some(contact_no) = self.contact_no {
            info.contact_no = contact_no;
        }
        if self.emergency_contact_no.is_some() {
            info.emergency_contact_no = self.emergency_contact_no;
        }
        if self.blood_group.is_some() {
            info.blood_group = self.blood_group;
        }
        if self.present_address.is_some() {
            info.present_address = self.present_address;
        }
        if self.permanent_address.is_some() {
            info.permanent_address = self.permanent_address;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    #[serde(default)]
    pub personal: PersonalInfoPatch,
    pub academic_semester: Option<EntityId>,
    pub academic_department: Option<EntityId>,
    pub academic_faculty: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyPatch {
    #[serde(default)]
    pub personal: PersonalInfoPatch,
    pub designation: Option<String>,
    pub academic_department: Option<EntityId>,
    pub academic_faculty: Option<EntityId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPatch {
    #[serde(default)]
    pub personal: PersonalInfoPatch,
    pub designation: Option<String>,
    pub management_department: Option<EntityId>,
}

/// Partial update of a profile. The variant must match the stored role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ProfilePatch {
    Student(StudentPatch),
    Faculty(FacultyPatch),
    Admin(AdminPatch),
}

impl ProfilePatch {
    pub fn role(&self) -> Role {
        match self {
            Self::Student(_) => Role::Student,
            Self::Faculty(_) => Role::Faculty,
            Self::Admin(_) => Role::Admin,
        }
    }

    /// References the patch changes, in validation order.
    pub fn references(&self) -> Vec<(ReferenceKind, &EntityId)> {
        let mut refs = Vec::new();
        match self {
            Self::Student(p) => {
                if let Some(id) = &p.academic_semester {
                    refs.push((ReferenceKind::AcademicSemester, id));
                }
                if let Some(id) = &p.academic_department {
                    refs.push((ReferenceKind::AcademicDepartment, id));
                }
                if let Some(id) = &p.academic_faculty {
                    refs.push((ReferenceKind::AcademicFaculty, id));
                }
            }
            Self::Faculty(p) => {
                if let Some(id) = &p.academic_department {
                    refs.push((ReferenceKind::AcademicDepartment, id));
                }
                if let Some(id) = &p.academic_faculty {
                    refs.push((ReferenceKind::AcademicFaculty, id));
                }
            }
            Self::Admin(p) => {
                if let Some(id) = &p.management_department {
                    refs.push((ReferenceKind::ManagementDepartment, id));
                }
            }
        }
        refs
    }

    /// Merges the patch into `profile`.
    pub fn apply(self, profile: &mut Profile, now: DateTime<Utc>) -> Result<()> {
        match (self, &mut profile.details) {
            (Self::Student(patch), ProfileDetails::Student(details)) => {
                patch.personal.apply(&mut details.personal);
                if let Some(id) = patch.academic_semester {
                    details.academic_semester = id;
                }
                if let Some(id) = patch.academic_department {
                    details.academic_department = id;
                }
                if let Some(id) = patch.academic_faculty {
                    details.academic_faculty = id;
                }
            }
            (Self::Faculty(patch), ProfileDetails::Faculty(details)) => {
                patch.personal.apply(&mut details.personal);
                if let Some(designation) = patch.designation {
                    details.designation = designation;
                }
                if let Some(id) = patch.academic_department {
                    details.academic_department = id;
                }
                if let Some(id) = patch.academic_faculty {
                    details.academic_faculty = id;
                }
            }
            (Self::Admin(patch), ProfileDetails::Admin(details)) => {
                patch.personal.apply(&mut details.personal);
                if let Some(designation) = patch.designation {
                    details.designation = designation;
                }
                if let Some(id) = patch.management_department {
                    details.management_department = id;
                }
            }
            (patch, details) => {
                return Err(RegistryError::validation(format!(
                    "cannot apply a {} update to a {} profile",
                    patch.role(),
                    details.role()
                )));
            }
        }
        profile.updated_at = now;
        Ok(())
    }
}
