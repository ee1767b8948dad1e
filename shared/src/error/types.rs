//! `AppError` and the JSON envelope every endpoint answers with

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error carried from the directory core to the HTTP layer.
///
/// `details` holds machine-readable context such as the offending
/// `employee_id` or the list of missing CSV columns.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's stock message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    // ===== Reporting structure =====

    pub fn employee_not_found(id: i64) -> Self {
        Self::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found"))
            .with_detail("employee_id", id)
    }

    pub fn manager_not_found(manager_id: i64) -> Self {
        Self::with_message(
            ErrorCode::ManagerNotFound,
            format!("Manager {manager_id} does not exist"),
        )
        .with_detail("manager_id", manager_id)
    }

    pub fn self_management(id: i64) -> Self {
        Self::new(ErrorCode::SelfManagement).with_detail("employee_id", id)
    }

    /// `employee_id` already sits above `manager_id`
    pub fn manager_cycle(employee_id: i64, manager_id: i64) -> Self {
        Self::with_message(
            ErrorCode::ManagerCycle,
            format!("Employee {employee_id} already manages {manager_id}, directly or indirectly"),
        )
        .with_detail("employee_id", employee_id)
        .with_detail("manager_id", manager_id)
    }

    // ===== Reference data =====

    pub fn department_not_found(id: i64) -> Self {
        Self::with_message(ErrorCode::DepartmentNotFound, format!("Department {id} not found"))
            .with_detail("department_id", id)
    }

    pub fn location_not_found(id: i64) -> Self {
        Self::with_message(ErrorCode::LocationNotFound, format!("Location {id} not found"))
            .with_detail("location_id", id)
    }
}

/// Response body: `code` 0 with `data` on success, the error code with
/// `message` and `details` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_message("OK", data)
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(code = %self.code, message = %self.message, "Request failed on a system error");
        }
        (self.http_status(), axum::Json(ApiResponse::error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_message() {
        let err = AppError::new(ErrorCode::EmployeeNotFound);
        assert_eq!(err.message, "Employee not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_details_accumulate() {
        let err = AppError::with_message(ErrorCode::ImportMissingColumns, "missing lastname")
            .with_detail("missing", vec!["lastname"])
            .with_detail("line", 1);
        let details = err.details.unwrap();
        assert_eq!(details["missing"], serde_json::json!(["lastname"]));
        assert_eq!(details["line"], serde_json::json!(1));
    }

    #[test]
    fn test_reporting_constructors() {
        let err = AppError::employee_not_found(7);
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
        assert_eq!(err.to_string(), "Employee 7 not found");
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);

        let err = AppError::manager_cycle(3, 9);
        assert_eq!(err.code, ErrorCode::ManagerCycle);
        let details = err.details.unwrap();
        assert_eq!(details["employee_id"], serde_json::json!(3));
        assert_eq!(details["manager_id"], serde_json::json!(9));

        let err = AppError::manager_not_found(4);
        assert_eq!(err.http_status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            AppError::self_management(2).code,
            ErrorCode::SelfManagement
        );
    }

    #[test]
    fn test_reference_constructors() {
        let err = AppError::department_not_found(5);
        assert_eq!(err.code, ErrorCode::DepartmentNotFound);
        assert!(err.details.unwrap().contains_key("department_id"));
        assert_eq!(
            AppError::location_not_found(6).code,
            ErrorCode::LocationNotFound
        );
    }

    #[test]
    fn test_error_envelope() {
        let response = ApiResponse::error(&AppError::database("disk I/O error"));
        assert_eq!(response.code, Some(9002));
        assert_eq!(response.message, "disk I/O error");
        assert!(response.data.is_none());
    }

    #[test]
    fn test_success_envelope_serialization() {
        let json = serde_json::to_string(&ApiResponse::success(42)).unwrap();
        assert!(json.contains("\"code\":0"));
        assert!(json.contains("\"data\":42"));
        assert!(!json.contains("details"));
    }
}
