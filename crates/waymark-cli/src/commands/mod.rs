//! Handlers for CLI subcommands.
//!
//! `main.rs` parses arguments and dispatches here. Handlers return the text
//! to print so they can be exercised without spawning a process.

pub mod path;
pub mod route;
