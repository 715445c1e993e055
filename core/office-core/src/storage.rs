//! Storage configuration and path management for Star Office.
//!
//! All file paths live here so the server, the CLI and the tests agree on where
//! `state.json` is.
//!
//! ## Layout
//!
//! ```text
//! $STAR_OFFICE_HOME (default ~/.star-office)
//! ├── state.json     the single activity record
//! ├── config.toml    optional server settings
//! ├── frontend/      static UI (index.html + assets)
//! └── logs/          set-state log files
//! ```

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{OfficeError, Result};

/// Environment variable that overrides the storage root.
pub const HOME_ENV: &str = "STAR_OFFICE_HOME";

const DEFAULT_DIR_NAME: &str = ".star-office";

/// Central configuration for all Star Office storage paths.
///
/// Production code uses [`StorageConfig::resolve`]. Tests use
/// [`StorageConfig::with_root`] for isolation.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    root: PathBuf,
}

impl StorageConfig {
    /// Resolves the root from `$STAR_OFFICE_HOME`, falling back to `~/.star-office`.
    pub fn resolve() -> Result<Self> {
        match env::var_os(HOME_ENV) {
            Some(root) if !root.is_empty() => Ok(Self::with_root(PathBuf::from(root))),
            _ => {
                let home = dirs::home_dir().ok_or(OfficeError::HomeDirNotFound)?;
                Ok(Self::with_root(home.join(DEFAULT_DIR_NAME)))
            }
        }
    }

    /// Creates a StorageConfig with a custom root directory.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to state.json (the persisted activity record).
    pub fn state_file(&self) -> PathBuf {
        self.root.join("state.json")
    }

    /// Path to config.toml (server settings).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Directory served as the front-end.
    pub fn frontend_dir(&self) -> PathBuf {
        self.root.join("frontend")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
