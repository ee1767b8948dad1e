//! CSV import result Models

use serde::{Deserialize, Serialize};

/// Aggregate outcome of a CSV import
///
/// Per-row detail goes to the logs only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Rows that were created
    pub imported: usize,
    /// Rows skipped as invalid
    pub errors: usize,
    /// Manager links applied after creation
    pub linked: usize,
    /// Manager links that could not be resolved or applied
    pub unresolved: usize,
}

/// Outcome of a manager-linking pass on its own
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSummary {
    pub linked: usize,
    pub unresolved: usize,
}
