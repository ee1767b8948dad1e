//! Directory core
//!
//! - [`hierarchy`] - org chart construction and structural checks (pure)
//! - [`store`] - persistence collaborator trait and its SQLite implementation
//! - [`service`] - member operations enforcing the hierarchy invariants

pub mod hierarchy;
pub mod service;
pub mod store;

pub use hierarchy::{build_filtered_forest, build_forest, reparent_on_delete};
pub use store::{DirectoryStore, SqliteStore};
