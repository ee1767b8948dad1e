//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::EmployeeNotFound
            | Self::DepartmentNotFound
            | Self::LocationNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::DepartmentNameExists
            | Self::LocationNameExists => StatusCode::CONFLICT,

            // 422 Unprocessable (well-formed but violates the reporting structure)
            Self::ManagerNotFound | Self::ManagerCycle | Self::SelfManagement => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 413 Payload Too Large
            Self::ImportTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
