//! Waymark CLI library.
//!
//! Subcommand handlers, file loading, and text rendering for the `waymark-cli`
//! binary.

pub mod commands;
pub mod input;
pub mod output;
pub mod terminal;
