// file: src/config/loader.rs
// version: 1.0.1
// guid: 9071a388-7d5a-43cc-9c97-e2a3344c576b

//! Configuration file loading
//!
//! The file is TOML with upper-case keys:
//!
//! ```toml
//! SSH_KEY_PATH = "~/.ssh/work_az_key"
//! SSH_KEY_PUB_PATH = "~/.ssh/work_az_key.pub"
//! AZ_USER = "jane.doe@example.com"
//! COPY_DEST_DIR = "~/Downloads/vm-files"
//! ```
//!
//! Every key is optional. Environment variables are not consulted.

use super::{expand, pub_path_for, Config, DEFAULT_AZ_USER, DEFAULT_COPY_DEST_DIR, DEFAULT_SSH_KEY_PATH};
use crate::error::{AzaError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(rename = "SSH_KEY_PATH")]
    ssh_key_path: Option<String>,
    #[serde(rename = "SSH_KEY_PUB_PATH")]
    ssh_key_pub_path: Option<String>,
    #[serde(rename = "AZ_USER")]
    az_user: Option<String>,
    #[serde(rename = "COPY_DEST_DIR")]
    copy_dest_dir: Option<String>,
}

/// Configuration loader
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader for the default per-user location
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Loader for an explicit file, which must exist
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// `<config dir>/aza/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aza").join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the default
    /// file is absent
    pub fn load(&self) -> Result<Config> {
        match &self.path {
            Some(path) => self.load_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => self.load_file(&path),
                _ => {
                    debug!("No config file found, using defaults");
                    Self::resolve(ConfigFile::default())
                }
            },
        }
    }

    /// Parse configuration from TOML text
    pub fn load_str(&self, content: &str) -> Result<Config> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| AzaError::config(format!("Failed to parse config: {}", e)))?;
        Self::resolve(file)
    }

    fn load_file(&self, path: &Path) -> Result<Config> {
        info!("Loading configuration from: {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| {
            AzaError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| {
            AzaError::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        Self::resolve(file)
    }

    fn resolve(file: ConfigFile) -> Result<Config> {
        let ssh_key_path = expand(&non_empty("SSH_KEY_PATH", file.ssh_key_path, DEFAULT_SSH_KEY_PATH)?);

        // The public key defaults to the private key's sibling, not to the
        // default public key, so overriding only SSH_KEY_PATH stays consistent.
        let ssh_key_pub_path = match file.ssh_key_pub_path {
            Some(p) => expand(&non_empty("SSH_KEY_PUB_PATH", Some(p), "")?),
            None => pub_path_for(&ssh_key_path),
        };

        let config = Config {
            ssh_key_path,
            ssh_key_pub_path,
            remote_username: non_empty("AZ_USER", file.az_user, DEFAULT_AZ_USER)?,
            copy_dest_dir: expand(&non_empty("COPY_DEST_DIR", file.copy_dest_dir, DEFAULT_COPY_DEST_DIR)?),
        };

        debug!("Final configuration: {:#?}", config);
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(key: &str, value: Option<String>, default: &str) -> Result<String> {
    match value {
        Some(v) if v.trim().is_empty() => Err(AzaError::config(format!("{} must not be empty", key))),
        Some(v) => Ok(v.trim().to_string()),
        None => Ok(default.to_string()),
    }
}
