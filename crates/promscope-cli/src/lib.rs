//! promscope CLI library.
//!
//! This module exposes internal types for testing purposes.
//! The main entry point is the `promscope` binary.

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;
pub mod remote;
pub mod repl;
pub mod timerange;

// Re-export commonly used types
pub use cli::Args;
pub use config::{ConfigError, Settings};
