//! Error types for office-core operations.
//!
//! Reads never surface errors (they fall back to the default record), so
//! almost everything here comes from writes and configuration loading.

use std::path::PathBuf;

/// All errors that can occur in office-core operations.
#[derive(Debug, thiserror::Error)]
pub enum OfficeError {
    // ─────────────────────────────────────────────────────────────────────
    // Persistence Errors
    // ─────────────────────────────────────────────────────────────────────
    /// The state file could not be written. The caller's state change was lost.
    #[error("Failed to persist state to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Home directory not found (set STAR_OFFICE_HOME to override)")]
    HomeDirNotFound,

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },
}

impl OfficeError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OfficeError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// True for failed writes of the state file.
    pub fn is_persistence(&self) -> bool {
        matches!(self, OfficeError::Persistence { .. })
    }
}

/// Convenience type alias for Results using OfficeError.
pub type Result<T> = std::result::Result<T, OfficeError>;
