//! TUI widgets for querybox.
//!
//! Contains reusable UI components.

pub mod chips;
pub mod completion;
pub mod header;
pub mod history;
pub mod input;
