//! CLI module for supportdesk
//!
//! Handles command-line argument parsing and terminal output.

pub mod args;
pub mod display;

pub use args::{Args, Commands, Verbosity};
