//! Tooling & Integration Layer
//!
//! Headless command-line driver for the shell core.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
