//! Utilities
//!
//! - [`AppError`] / [`ApiResponse`] - unified error and envelope (from `shared::error`)
//! - [`logger`] - tracing setup
//! - [`validation`] - input checks for member payloads

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use error::{ok, ok_with_message};
