// file: src/azure/mod.rs
// version: 1.0.0
// guid: 11edf90b-8534-45ca-85c5-a36778522390

//! Azure resource listing through the `az` CLI

pub mod lister;
pub mod records;

pub use lister::AzureCli;
pub use records::{Subscription, VirtualMachine};
