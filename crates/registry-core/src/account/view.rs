//! Denormalized account view returned to callers.
//!
//! The view joins an account with its profile and the profile's catalog
//! references. It never carries the credential hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Account, Role};
use crate::academic::{
    AcademicDepartment, AcademicFaculty, AcademicSemester, ManagementDepartment,
};
use crate::identifier::ExternalId;
use crate::profile::{PersonalInfo, ProfileId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedStudent {
    pub id: ProfileId,
    pub external_id: ExternalId,
    pub personal: PersonalInfo,
    pub academic_semester: Option<AcademicSemester>,
    pub academic_department: Option<AcademicDepartment>,
    pub academic_faculty: Option<AcademicFaculty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedFaculty {
    pub id: ProfileId,
    pub external_id: ExternalId,
    pub personal: PersonalInfo,
    pub designation: String,
    pub academic_department: Option<AcademicDepartment>,
    pub academic_faculty: Option<AcademicFaculty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedAdmin {
    pub id: ProfileId,
    pub external_id: ExternalId,
    pub personal: PersonalInfo,
    pub designation: String,
    pub management_department: Option<ManagementDepartment>,
}

/// A profile with its catalog references resolved.
///
/// A reference whose entity has since disappeared resolves to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ExpandedProfile {
    Student(ExpandedStudent),
    Faculty(ExpandedFaculty),
    Admin(ExpandedAdmin),
}

impl ExpandedProfile {
    pub fn external_id(&self) -> &ExternalId {
        match self {
            Self::Student(p) => &p.external_id,
            Self::Faculty(p) => &p.external_id,
            Self::Admin(p) => &p.external_id,
        }
    }
}

/// Account as exposed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub external_id: ExternalId,
    pub role: Role,
    pub requires_credential_reset: bool,
    pub credential_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile: Option<ExpandedProfile>,
}

impl AccountView {
    pub fn new(account: &Account, profile: Option<ExpandedProfile>) -> Self {
        Self {
            external_id: account.external_id.clone(),
            role: account.role,
            requires_credential_reset: account.requires_credential_reset,
            credential_changed_at: account.credential_changed_at,
            created_at: account.created_at,
            updated_at: account.updated_at,
            profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::ProfileRef;
    use crate::credential::CredentialHash;
    use crate::profile::{Gender, PersonName};

    #[test]
    fn test_view_never_serializes_credential() {
        let now = Utc::now();
        let account = Account {
            external_id: ExternalId::from("A-00001"),
            role: Role::Admin,
            credential_hash: CredentialHash::new("sha256$1$abcd$ef01"),
            requires_credential_reset: true,
            credential_changed_at: None,
            profile_ref: ProfileRef::Admin(ProfileId::new("p-1")),
            created_at: now,
            updated_at: now,
        };
        let profile = ExpandedProfile::Admin(ExpandedAdmin {
            id: ProfileId::new("p-1"),
            external_id: ExternalId::from("A-00001"),
            personal: PersonalInfo {
                name: PersonName {
                    first_name: "Ada".to_string(),
                    middle_name: None,
                    last_name: "Lovelace".to_string(),
                },
                gender: Gender::Female,
                date_of_birth: None,
                email: "ada@example.edu".to_string(),
                contact_no: "0100".to_string(),
                emergency_contact_no: None,
                blood_group: None,
                present_address: None,
                permanent_address: None,
            },
            designation: "Registrar".to_string(),
            management_department: None,
        });

        let view = AccountView::new(&account, Some(profile));
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("sha256"));
        assert!(!json.contains("credentialHash"));
        assert!(json.contains("\"externalId\":\"A-00001\""));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
