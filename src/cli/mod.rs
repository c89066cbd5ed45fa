//! CLI module for sqlkv
//!
//! Parses flags, opens the database and runs the HTTP server until an
//! interrupt arrives.

mod args;
mod commands;
mod errors;

pub use args::{normalize_args, Cli};
pub use commands::{run, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
