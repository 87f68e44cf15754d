//! carbontrace CLI library.
//!
//! This library provides the core functionality for the carbontrace
//! command-line interface: configuration profiles, filter expression
//! parsing, the interactive filter session, command execution and output
//! formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod expr;
pub mod output;
pub mod repl;
pub mod validation;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
