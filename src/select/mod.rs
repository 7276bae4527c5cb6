// file: src/select/mod.rs
// version: 1.1.0
// guid: 6432b9f7-eaf4-404c-a15a-32c46cfc46c7

//! Interactive selection of one record from a listing
//!
//! Index resolution (`resolve_index`) is pure; presentation lives in
//! [`table`]; [`Selector`] only wires the two to an input and an output.

pub mod selector;
pub mod table;

pub use selector::{resolve_index, Selector, TerminalSelector};

/// A record that can be listed in a selection table
pub trait Selectable {
    /// Table title
    const TITLE: &'static str;
    /// Column headings, excluding the index column
    const HEADERS: &'static [&'static str];

    /// One cell per heading
    fn cells(&self) -> Vec<String>;

    /// Line echoed once the record has been chosen
    fn describe(&self) -> String;
}
