//! Data models
//!
//! Shared between org-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod department;
pub mod employee;
pub mod hierarchy;
pub mod import;
pub mod location;
pub mod serde_helpers;

// Re-exports
pub use department::*;
pub use employee::*;
pub use hierarchy::*;
pub use import::*;
pub use location::*;
