//! Unified Result Types
//!
//! Provides type aliases for commonly used Result types across the application

use crate::db::repository::RepoError;

pub use shared::error::AppResult;

/// Persistence-level Result type
///
/// Used by the directory store and the import pipeline
pub type StoreResult<T> = Result<T, RepoError>;
