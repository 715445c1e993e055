//! Server configuration loaded from `config.toml`.
//!
//! Every field has a default, so a missing file (or a file with only some
//! keys) is fine. Command-line flags are applied on top by the server.
//!
//! ```toml
//! host = "127.0.0.1"
//! port = 18793
//! state_file = "/var/lib/star-office/state.json"
//! frontend_dir = "/srv/star-office/frontend"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{OfficeError, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 18793;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Overrides `<root>/state.json`.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
    /// Overrides `<root>/frontend`.
    #[serde(default)]
    pub frontend_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            state_file: None,
            frontend_dir: None,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Loads the server config, returning defaults if the file doesn't exist.
pub fn load_server_config(path: &Path) -> Result<ServerConfig> {
    if !path.exists() {
        return Ok(ServerConfig::default());
    }

    let content = fs_err::read_to_string(path).map_err(|source| OfficeError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<ServerConfig>(&content).map_err(|err| OfficeError::ConfigMalformed {
        path: path.to_path_buf(),
        details: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_server_config_defaults_when_file_missing() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let config = load_server_config(&temp_dir.path().join("missing.toml")).expect("load");
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 18793);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn load_server_config_parses_partial_file() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("config.toml");
        fs_err::write(
            &path,
            r#"
port = 9000
frontend_dir = "/srv/office"
"#,
        )
        .expect("write config");

        let config = load_server_config(&path).expect("load config");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.frontend_dir, Some(PathBuf::from("/srv/office")));
        assert_eq!(config.state_file, None);
    }

    #[test]
    fn load_server_config_rejects_malformed_file() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("config.toml");
        fs_err::write(&path, "port = \"not a number\"").expect("write config");

        let err = load_server_config(&path).unwrap_err();
        assert!(matches!(err, OfficeError::ConfigMalformed { .. }));
    }

    #[test]
    fn load_server_config_rejects_unknown_keys() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("config.toml");
        fs_err::write(&path, "prot = 1").expect("write config");

        assert!(load_server_config(&path).is_err());
    }
}
