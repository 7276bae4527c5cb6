// file: src/config/mod.rs
// version: 1.0.1
// guid: 8647c13c-d4cb-4b5d-b590-19224bc5c8b0

//! Configuration module for aza
//!
//! Supplies the SSH key paths, the remote login name and the local copy
//! destination. Loaded once in `main` and passed by reference afterwards.

pub mod loader;

pub use loader::ConfigLoader;

use std::path::{Path, PathBuf};

/// Default private key location, before tilde expansion
pub const DEFAULT_SSH_KEY_PATH: &str = "~/.ssh/aza_key";

/// Default remote login name; Azure's conventional admin user
pub const DEFAULT_AZ_USER: &str = "azureuser";

/// Default destination directory for `cp`, before tilde expansion
pub const DEFAULT_COPY_DEST_DIR: &str = "~/aza-downloads";

/// Resolved, read-only configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Private key handed to `ssh`/`scp` and created by `genkey`
    pub ssh_key_path: PathBuf,
    /// Public key installed on VMs by `setuser`
    pub ssh_key_pub_path: PathBuf,
    /// Login name used on the remote VM
    pub remote_username: String,
    /// Local directory `cp` copies into
    pub copy_dest_dir: PathBuf,
}

impl Config {
    pub fn ssh_key_path(&self) -> &Path {
        &self.ssh_key_path
    }

    pub fn ssh_key_pub_path(&self) -> &Path {
        &self.ssh_key_pub_path
    }

    pub fn remote_username(&self) -> &str {
        &self.remote_username
    }

    pub fn copy_dest_dir(&self) -> &Path {
        &self.copy_dest_dir
    }
}

impl Default for Config {
    fn default() -> Self {
        let ssh_key_path = expand(DEFAULT_SSH_KEY_PATH);
        Self {
            ssh_key_pub_path: pub_path_for(&ssh_key_path),
            ssh_key_path,
            remote_username: DEFAULT_AZ_USER.to_string(),
            copy_dest_dir: expand(DEFAULT_COPY_DEST_DIR),
        }
    }
}

/// Expand a leading `~` to the home directory
pub(crate) fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// `<key>.pub` next to the private key
pub(crate) fn pub_path_for(key: &Path) -> PathBuf {
    let mut os = key.as_os_str().to_owned();
    os.push(".pub");
    PathBuf::from(os)
}
