//! Error types for hierarchy loading.

use thiserror::Error;

use super::node::ObjectKind;

/// Errors that can occur while loading or building a hierarchy.
#[derive(Error, Debug)]
pub enum HierarchyError {
    /// I/O error while reading a hierarchy file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A container appears twice; only images may have several parents
    #[error("{kind:?} {id} appears more than once")]
    DuplicateContainer {
        /// Kind of the repeated container
        kind: ObjectKind,
        /// Server id of the repeated container
        id: u64,
    },
}
