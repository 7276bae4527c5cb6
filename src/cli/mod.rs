// file: src/cli/mod.rs
// version: 1.0.1
// guid: 455f6e67-14dc-4a79-9eeb-5b096bd4e0e7

//! Command line interface for aza

pub mod args;
pub mod commands;

pub use args::{normalize_args, Cli, Commands};
pub use commands::{Dispatcher, Operation, OperationRequest, Outcome};
