//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// mobilizon-agenda - Mobilizon events for static sites
#[derive(Debug, Parser)]
#[command(name = "mobilizon-agenda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "MOBILIZON_AGENDA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the agenda for a page
    Render(RenderArgs),

    /// List the files a render registers for publication
    Assets(RenderArgs),

    /// Delete the cache directory
    Clean,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options shared by `render` and `assets`.
#[derive(Debug, Clone, Default, Args)]
pub struct RenderArgs {
    /// Comma-separated organizer handles, tag slugs or tag titles
    #[arg(long, short)]
    pub allow: Option<String>,

    /// Page URL the agenda is rendered for, e.g. /agenda/
    #[arg(long, short)]
    pub page: Option<String>,

    /// Output format
    #[arg(long, short, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Built-in renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per event
    #[default]
    Text,
    /// One JSON render context per line
    Json,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
