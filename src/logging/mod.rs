// file: src/logging/mod.rs
// version: 1.0.1
// guid: 1cd6b8a9-9ddf-44ae-ae30-877d0115bb92

//! Logging system for aza

pub mod logger;

pub use logger::{init_logger, with_async_operation_span};
