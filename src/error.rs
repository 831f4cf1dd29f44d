//! Error types for packaging operations.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Result type alias for packaging operations
pub type Result<T> = std::result::Result<T, PackError>;

/// Every failure is terminal for a run: the installer is either written in
/// full or not written at all.
#[derive(Error, Debug)]
pub enum PackError {
    /// The root is not a directory, or an option value is unusable
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Reason for the error
        reason: String,
    },

    /// A file could not be read or is not valid UTF-8
    #[error("Failed to read file {path}")]
    UnreadableFile {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be listed
    #[error("Failed to list directory {path}")]
    UnreadableDirectory {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external installer template could not be loaded
    #[error("Template {path} could not be loaded")]
    MissingTemplate {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The escaper matched a token it has no replacement for
    #[error("Unexpected delimiter token {token:?} while escaping")]
    MalformedEscapeInput { token: String },

    /// The installer could not be written
    #[error("Failed to write {path}")]
    WriteOutput {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PackError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        PackError::InvalidInput {
            reason: reason.into(),
        }
    }
}
