//! # Shell Configuration
//!
//! ## Load Order (later overrides earlier)
//! 1. Default values
//! 2. Config file (`otorite.toml` in the platform config directory, or the
//!    path given on the command line)
//! 3. Environment variables
//!
//! ## Example Config File
//! ```toml
//! [backend]
//! url = "https://api.otorite.example"
//! request_timeout_secs = 15
//!
//! [storage]
//! path = "/var/lib/otorite/otorite.db"
//! ephemeral = false
//! ```
//!
//! ## Environment
//! | Variable | Field |
//! |----------|-------|
//! | `OTORITE_BACKEND_URL` | `backend.url` |
//! | `OTORITE_REQUEST_TIMEOUT_SECS` | `backend.request_timeout_secs` |
//! | `OTORITE_STORAGE_PATH` | `storage.path` |
//! | `OTORITE_EPHEMERAL` | `storage.ephemeral` |

use std::path::PathBuf;

use directories::ProjectDirs;
use otorite_client::ClientConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ShellError, ShellResult};

const CONFIG_FILE: &str = "otorite.toml";
const DATABASE_FILE: &str = "otorite.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "otorite", "client")
}

/// Where the stores persist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Defaults to `otorite.db` in the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Keep everything in memory; nothing survives the process.
    #[serde(default)]
    pub ephemeral: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    #[serde(default)]
    pub backend: ClientConfig,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl ShellConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> ShellResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading shell config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> ShellResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.backend.apply_overrides(&lookup);

        if let Some(path) = lookup("OTORITE_STORAGE_PATH") {
            debug!(path = %path, "Overriding storage path from environment");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Some(flag) = lookup("OTORITE_EPHEMERAL") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.storage.ephemeral = true,
                "0" | "false" | "no" => self.storage.ephemeral = false,
                _ => warn!(value = %flag, "Ignoring unrecognized OTORITE_EPHEMERAL value"),
            }
        }
    }

    pub fn validate(&self) -> ShellResult<()> {
        self.backend.validate()?;

        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(ShellError::InvalidConfig("storage.path is empty".into()));
            }
        }

        Ok(())
    }

    /// The SQLite file to open, or `None` in ephemeral mode.
    pub fn database_path(&self) -> ShellResult<Option<PathBuf>> {
        if self.storage.ephemeral {
            return Ok(None);
        }

        if let Some(path) = &self.storage.path {
            return Ok(Some(path.clone()));
        }

        let dirs = project_dirs().ok_or_else(|| {
            ShellError::InvalidConfig("Could not determine app data directory".into())
        })?;
        Ok(Some(dirs.data_dir().join(DATABASE_FILE)))
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ShellConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.storage.ephemeral);
        assert_eq!(config.backend.url, "http://localhost:8001");
    }

    #[test]
    fn test_parse_file() {
        let config = ShellConfig::from_toml(
            r#"
            [backend]
            url = "https://api.otorite.example"

            [storage]
            path = "/tmp/otorite-test.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.url, "https://api.otorite.example");
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert_eq!(
            config.database_path().unwrap(),
            Some(PathBuf::from("/tmp/otorite-test.db"))
        );
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ShellConfig::from_toml("").unwrap(), ShellConfig::default());
    }

    #[test]
    fn test_bad_file_is_parse_error() {
        let err = ShellConfig::from_toml("[backend\nurl = 3").unwrap_err();
        assert!(matches!(err, ShellError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ShellConfig::default();
        config.apply_overrides(env(&[
            ("OTORITE_BACKEND_URL", "https://staging.otorite.example"),
            ("OTORITE_STORAGE_PATH", "/data/otorite.db"),
            ("OTORITE_EPHEMERAL", "TRUE"),
        ]));

        assert_eq!(config.backend.url, "https://staging.otorite.example");
        assert_eq!(config.storage.path, Some(PathBuf::from("/data/otorite.db")));
        assert!(config.storage.ephemeral);
        assert_eq!(config.database_path().unwrap(), None);
    }

    #[test]
    fn test_unrecognized_ephemeral_value_ignored() {
        let mut config = ShellConfig::default();
        config.apply_overrides(env(&[("OTORITE_EPHEMERAL", "maybe")]));
        assert!(!config.storage.ephemeral);
    }

    #[test]
    fn test_invalid_backend_url_rejected() {
        let mut config = ShellConfig::default();
        config.backend.url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(ShellError::Client(_))));
    }
}
