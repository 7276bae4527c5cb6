// file: src/error.rs
// version: 1.0.1
// guid: 523a98cc-cb3f-4e37-8f8e-a6cbb5d3af2f

use std::path::Path;
use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AzaError>;

/// Exit status used when the operator interrupts a prompt or a running child
pub const EXIT_CANCELLED: i32 = 130;

/// Error types for aza
///
/// Every variant is terminal: it is reported once by `main` and the process
/// exits with [`AzaError::exit_code`].
#[derive(Error, Debug)]
pub enum AzaError {
    #[error("failed to launch `{program}`: {reason}")]
    LaunchFailure { program: String, reason: String },

    #[error("{step} failed, check your Azure CLI login/status")]
    CliUnavailable { step: String },

    #[error("failed to parse JSON output from `{command}`: {reason}")]
    ResponseParse { command: String, reason: String },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("error reading SSH public key from {path}: {reason}")]
    KeyRead { path: String, reason: String },

    #[error("could not resolve a public IP for VM {vm}: {reason}")]
    AddressResolution { vm: String, reason: String },

    #[error("failed to restrict permissions on {path}")]
    PermissionSet { path: String },

    #[error("SSH key generation failed: {0}")]
    KeyGeneration(String),

    #[error("{step} exited with status {code}")]
    CommandFailed { step: String, code: i32 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AzaError {
    /// Create a new launch failure
    pub fn launch(program: impl Into<String>, reason: impl ToString) -> Self {
        Self::LaunchFailure {
            program: program.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new response parse error
    pub fn response_parse(command: impl Into<String>, reason: impl ToString) -> Self {
        Self::ResponseParse {
            command: command.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a new invalid selection error
    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        Self::InvalidSelection(msg.into())
    }

    /// Create a new key read error
    pub fn key_read(path: &Path, reason: impl ToString) -> Self {
        Self::KeyRead {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new address resolution error
    pub fn address_resolution(vm: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AddressResolution {
            vm: vm.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new command failure for a named step
    pub fn command_failed(step: impl Into<String>, code: i32) -> Self {
        Self::CommandFailed {
            step: step.into(),
            code,
        }
    }

    /// Process exit status for this error; never zero
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled => EXIT_CANCELLED,
            Self::CommandFailed { code, .. } if *code > 0 => *code,
            _ => 1,
        }
    }
}
