//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use crate::utils::AppError;
use shared::models::{EmployeeCreate, EmployeeUpdate};

// ── Text length limits ──────────────────────────────────────────────

/// Person names, department and location names
pub const MAX_NAME_LEN: usize = 200;

/// Job description, management category
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, gender, service assignment code
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate an optional `YYYY-MM-DD` date
pub fn validate_optional_date(value: &Option<String>, field: &str) -> Result<(), AppError> {
    if let Some(v) = value
        && shared::util::normalize_date(v).is_none()
    {
        return Err(AppError::validation(format!(
            "{field} must be a YYYY-MM-DD date, got '{v}'"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "professional_email", MAX_EMAIL_LEN)?;
    let v = value.trim();
    match v.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !v.contains(' ') => {
            Ok(())
        }
        _ => Err(AppError::validation(format!("'{v}' is not a valid email address"))),
    }
}

pub fn validate_employee_create(data: &EmployeeCreate) -> Result<(), AppError> {
    validate_required_text(&data.firstname, "firstname", MAX_NAME_LEN)?;
    validate_required_text(&data.lastname, "lastname", MAX_NAME_LEN)?;
    validate_required_text(&data.job_description, "job_description", MAX_NOTE_LEN)?;
    validate_email(&data.professional_email)?;
    validate_optional_text(&data.management_category, "management_category", MAX_NOTE_LEN)?;
    validate_optional_text(
        &data.service_assignment_code,
        "service_assignment_code",
        MAX_SHORT_TEXT_LEN,
    )?;
    validate_optional_text(&data.gender, "gender", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.phone_number, "phone_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.image_url, "image_url", MAX_URL_LEN)?;
    validate_optional_date(&data.start_date, "start_date")?;
    validate_optional_date(&data.birthday, "birthday")?;
    Ok(())
}

/// Fields present in a patch obey the same rules as on creation
pub fn validate_employee_update(data: &EmployeeUpdate) -> Result<(), AppError> {
    if let Some(v) = &data.firstname {
        validate_required_text(v, "firstname", MAX_NAME_LEN)?;
    }
    if let Some(v) = &data.lastname {
        validate_required_text(v, "lastname", MAX_NAME_LEN)?;
    }
    if let Some(v) = &data.job_description {
        validate_required_text(v, "job_description", MAX_NOTE_LEN)?;
    }
    if let Some(v) = &data.professional_email {
        validate_email(v)?;
    }
    validate_optional_text(&data.management_category, "management_category", MAX_NOTE_LEN)?;
    validate_optional_text(
        &data.service_assignment_code,
        "service_assignment_code",
        MAX_SHORT_TEXT_LEN,
    )?;
    validate_optional_text(&data.gender, "gender", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.phone_number, "phone_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.image_url, "image_url", MAX_URL_LEN)?;
    validate_optional_date(&data.start_date, "start_date")?;
    validate_optional_date(&data.birthday, "birthday")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    fn valid() -> EmployeeCreate {
        EmployeeCreate {
            firstname: "Ada".into(),
            lastname: "Lovelace".into(),
            job_description: "Engineer".into(),
            professional_email: "ada@example.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_create_passes() {
        assert!(validate_employee_create(&valid()).is_ok());
    }

    #[test]
    fn test_blank_required_field_fails() {
        let mut data = valid();
        data.lastname = "   ".into();
        let err = validate_employee_create(&data).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("lastname"));
    }

    #[test]
    fn test_bad_email_and_date_fail() {
        let mut data = valid();
        data.professional_email = "not-an-email".into();
        assert!(validate_employee_create(&data).is_err());

        let mut data = valid();
        data.birthday = Some("31/12/1990".into());
        let err = validate_employee_create(&data).unwrap_err();
        assert!(err.details.unwrap().contains_key("field"));
    }

    #[test]
    fn test_update_only_checks_present_fields() {
        assert!(validate_employee_update(&EmployeeUpdate::default()).is_ok());
        let patch = EmployeeUpdate {
            firstname: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_employee_update(&patch).is_err());
    }

    #[test]
    fn test_too_long_text() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
        assert!(validate_optional_text(&Some(long), "name", MAX_NAME_LEN).is_err());
        assert!(validate_optional_text(&None, "name", MAX_NAME_LEN).is_ok());
    }
}
