use anyhow::Result;

use registry_core::academic::{
    EntityId, Month, NewAcademicDepartment, NewAcademicFaculty, NewAcademicSemester,
    NewManagementDepartment, SemesterCode, SemesterTitle, SemesterYear,
};

use super::print_json;
use crate::app::App;

pub fn parse_title(value: &str) -> Result<SemesterTitle, String> {
    match value.to_ascii_lowercase().as_str() {
        "autumn" => Ok(SemesterTitle::Autumn),
        "summer" => Ok(SemesterTitle::Summer),
        "fall" => Ok(SemesterTitle::Fall),
        other => Err(format!("unknown semester title '{}'", other)),
    }
}

pub fn parse_code(value: &str) -> Result<SemesterCode, String> {
    SemesterCode::parse(value).map_err(|e| e.to_string())
}

pub async fn add_semester(
    app: &App,
    title: SemesterTitle,
    year: &str,
    code: SemesterCode,
    start_month: Month,
    end_month: Month,
) -> Result<()> {
    let semester = app
        .store
        .insert_semester(NewAcademicSemester {
            title,
            year: SemesterYear::parse(year)?,
            code,
            start_month,
            end_month,
        })
        .await?;
    print_json(&semester)
}

pub async fn add_faculty(app: &App, title: String) -> Result<()> {
    let faculty = app
        .store
        .insert_academic_faculty(NewAcademicFaculty { title })
        .await?;
    print_json(&faculty)
}

pub async fn add_department(app: &App, title: String, faculty: String) -> Result<()> {
    let department = app
        .store
        .insert_department(NewAcademicDepartment {
            title,
            academic_faculty: EntityId::new(faculty),
        })
        .await?;
    print_json(&department)
}

pub async fn add_management_department(app: &App, title: String) -> Result<()> {
    let department = app
        .store
        .insert_management_department(NewManagementDepartment { title })
        .await?;
    print_json(&department)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title_is_case_insensitive() {
        assert_eq!(parse_title("Summer").unwrap(), SemesterTitle::Summer);
        assert!(parse_title("winter").is_err());
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("03").unwrap(), SemesterCode::Third);
        assert!(parse_code("3").is_err());
    }
}
