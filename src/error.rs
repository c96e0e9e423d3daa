//! Error types for the project session.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for toolkit operations.
pub type ToolkitResult<T> = Result<T, ToolkitError>;

/// Errors that can occur while loading, saving, importing or editing a project.
///
/// Load, save and import failures are reported to the session's status sink
/// before they are returned, so callers may drop them without losing the
/// user-visible outcome.
#[derive(Error, Debug)]
pub enum ToolkitError {
    /// The persistence store could not be read or written.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Stored or imported JSON is malformed or missing a required field.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Well-formed JSON that is not a project file.
    #[error("Invalid project file format: {0}")]
    ImportFormatInvalid(String),

    /// Index out of bounds for a panel, shot or script element list.
    #[error("Index {index} out of bounds for list of length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// No panel or shot with this id exists on the surface.
    #[error("Entity not found: {0}")]
    EntityNotFound(Uuid),

    /// Session configuration is invalid.
    #[error("Config error: {0}")]
    Config(String),
}

impl ToolkitError {
    /// Creates a StoreUnavailable error.
    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    /// Creates an ImportFormatInvalid error.
    pub fn import_format_invalid(msg: impl Into<String>) -> Self {
        Self::ImportFormatInvalid(msg.into())
    }

    /// Creates an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        Self::IndexOutOfBounds { index, length }
    }

    /// Creates a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
