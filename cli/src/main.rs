use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use framepack::args::{Cli, Command};
use framepack::bootstrap::state::AppState;
use framepack::commands;
use framepack::config_loader::{self, ConfigOverrides};
use framepack::observability;
use framepack_application::error::AppResult;
use framepack_application::infrastructure_config::{Config, LoggingConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = ConfigOverrides::from_cli(&cli).and_then(|overrides| {
        config_loader::load_config(&overrides)
    });

    let logging = config
        .as_ref()
        .map_or_else(|_| LoggingConfig::default(), |config| config.logging.clone());
    if observability::tracing::setup_logging(&logging).is_err() {
        return ExitCode::FAILURE;
    }

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: Config) -> AppResult<()> {
    info!("Configuration loaded successfully");
    let state = AppState::new(config);

    match &cli.command {
        Command::Encode(args) => {
            commands::encode::run(&state, args).await?;
        }
        Command::Play(args) => {
            commands::play::run(&state, args).await?;
        }
        Command::Inspect(args) => {
            commands::inspect::run(&state, &args.document)?;
        }
    }

    Ok(())
}
