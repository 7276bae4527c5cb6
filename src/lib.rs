// file: src/lib.rs
// version: 1.0.1
// guid: 97695d2b-4435-4282-bebb-3f4402e0a97a

//! # aza
//!
//! A small operator's helper around the Azure CLI, `ssh` and `scp`: list
//! VMs or subscriptions, pick one by index, then provision a login user,
//! open an SSH session, copy files off the VM, switch subscription or
//! generate the SSH key pair used for all of it.
//!
//! Every external program is run through [`executor::CommandExecutor`], one
//! child at a time.

pub mod azure;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod select;

pub use error::{AzaError, Result};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
