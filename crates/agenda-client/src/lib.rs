//! CLI, config file, built-in renderers
//!
//! This crate provides the `mobilizon-agenda` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod renderer;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
