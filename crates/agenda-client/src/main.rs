//! mobilizon-agenda CLI entry point.

use std::process::ExitCode;

use agenda_core::{TracingConfig, init_tracing};
use clap::Parser;

use agenda_client::cli::{Cli, Command, ConfigAction};
use agenda_client::commands;
use agenda_client::config::ClientConfig;
use agenda_client::error::{ClientError, ClientResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::build_log()
    };
    if let Err(e) = init_tracing(tracing) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path).map_err(ClientError::Config)?,
        None => ClientConfig::load().map_err(ClientError::Config)?,
    };

    match cli.command {
        Command::Render(ref args) => commands::render::render(&config, args).await,
        Command::Assets(ref args) => commands::render::assets(&config, args).await,
        Command::Clean => commands::clean::clean(&config),
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
