//! querybox - A schema-aware inline autocomplete query box for the terminal.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod schema;
pub mod tui;
