//! Error types for model loading and saving.

use std::path::PathBuf;

/// Errors that can occur while reading or writing model files.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading/writing model files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Model file not found.
    #[error("model file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
