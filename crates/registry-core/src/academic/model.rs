//! Academic catalog entities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RegistryError, Result};

/// Store-generated identity of a catalog entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Semester titles offered by the university.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemesterTitle {
    Autumn,
    Summer,
    Fall,
}

impl SemesterTitle {
    /// The code each title is bound to.
    pub fn code(&self) -> SemesterCode {
        match self {
            Self::Autumn => SemesterCode::First,
            Self::Summer => SemesterCode::Second,
            Self::Fall => SemesterCode::Third,
        }
    }
}

/// Two-digit semester code embedded in student identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemesterCode {
    #[serde(rename = "01")]
    First,
    #[serde(rename = "02")]
    Second,
    #[serde(rename = "03")]
    Third,
}

impl SemesterCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "01",
            Self::Second => "02",
            Self::Third => "03",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "01" => Ok(Self::First),
            "02" => Ok(Self::Second),
            "03" => Ok(Self::Third),
            other => Err(RegistryError::validation(format!(
                "semester code must be 01, 02 or 03, got '{}'",
                other
            ))),
        }
    }
}

/// Four-digit calendar year of a semester.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SemesterYear(String);

impl SemesterYear {
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RegistryError::validation(format!(
                "semester year must have four digits, got '{}'",
                value
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last two digits, as used in student identifiers.
    pub fn short(&self) -> &str {
        &self.0[2..]
    }
}

impl TryFrom<String> for SemesterYear {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SemesterYear> for String {
    fn from(year: SemesterYear) -> Self {
        year.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl std::str::FromStr for Month {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        let month = match s.to_ascii_lowercase().as_str() {
            "january" => Self::January,
            "february" => Self::February,
            "march" => Self::March,
            "april" => Self::April,
            "may" => Self::May,
            "june" => Self::June,
            "july" => Self::July,
            "august" => Self::August,
            "september" => Self::September,
            "october" => Self::October,
            "november" => Self::November,
            "december" => Self::December,
            other => {
                return Err(RegistryError::validation(format!(
                    "unknown month '{}'",
                    other
                )));
            }
        };
        Ok(month)
    }
}

/// An academic semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicSemester {
    pub id: EntityId,
    pub title: SemesterTitle,
    pub year: SemesterYear,
    pub code: SemesterCode,
    pub start_month: Month,
    pub end_month: Month,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicFaculty {
    pub id: EntityId,
    pub title: String,
}

/// A department, owned by an academic faculty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicDepartment {
    pub id: EntityId,
    pub title: String,
    pub academic_faculty: EntityId,
}

/// Administrative unit an admin belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementDepartment {
    pub id: EntityId,
    pub title: String,
}
