//! Unified error codes for the org directory
//!
//! This module defines all error codes used by org-server and its API clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 8xxx: Directory errors (employees, departments, locations, import)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 80xx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Manager reference points at a missing employee
    ManagerNotFound = 8002,
    /// Manager change would make an employee its own ancestor
    ManagerCycle = 8003,
    /// Employee cannot manage itself
    SelfManagement = 8004,

    // ==================== 81xx: Department / Location ====================
    /// Department not found
    DepartmentNotFound = 8101,
    /// Department name already exists
    DepartmentNameExists = 8102,
    /// Location not found
    LocationNotFound = 8111,
    /// Location name already exists
    LocationNameExists = 8112,

    // ==================== 82xx: Import ====================
    /// Import file is empty
    ImportEmptyFile = 8201,
    /// Import header is missing required columns
    ImportMissingColumns = 8202,
    /// Import file is too large
    ImportTooLarge = 8203,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidFormat => "Invalid format",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::ManagerNotFound => "Manager not found",
            ErrorCode::ManagerCycle => "Manager change would create a reporting cycle",
            ErrorCode::SelfManagement => "Employee cannot be their own manager",

            // Department / Location
            ErrorCode::DepartmentNotFound => "Department not found",
            ErrorCode::DepartmentNameExists => "Department name already exists",
            ErrorCode::LocationNotFound => "Location not found",
            ErrorCode::LocationNameExists => "Location name already exists",

            // Import
            ErrorCode::ImportEmptyFile => "Import file is empty",
            ErrorCode::ImportMissingColumns => "Import header is missing required columns",
            ErrorCode::ImportTooLarge => "Import file is too large",

            // System
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            6 => Ok(ErrorCode::InvalidFormat),

            // Employee
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8002 => Ok(ErrorCode::ManagerNotFound),
            8003 => Ok(ErrorCode::ManagerCycle),
            8004 => Ok(ErrorCode::SelfManagement),

            // Department / Location
            8101 => Ok(ErrorCode::DepartmentNotFound),
            8102 => Ok(ErrorCode::DepartmentNameExists),
            8111 => Ok(ErrorCode::LocationNotFound),
            8112 => Ok(ErrorCode::LocationNameExists),

            // Import
            8201 => Ok(ErrorCode::ImportEmptyFile),
            8202 => Ok(ErrorCode::ImportMissingColumns),
            8203 => Ok(ErrorCode::ImportTooLarge),

            // System
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
