//! Sierpinski CLI Library
//!
//! Argument parsing, configuration layering, the interactive console and the
//! one-shot API commands behind the `sierpinski` binary.

pub mod args;
pub mod commands;
pub mod config;
pub mod console_helper;
pub mod shell;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
