// bcats - Business Central Availability-to-Sell Reporting
// Copyright (c) 2025 bcats Contributors
// Licensed under the MIT License

use bcats::cli::{Cli, Commands};
use bcats::config::{load_config, BcatsConfig};
use bcats::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Commands that talk to Business Central need a valid configuration,
    // which also carries the logging settings
    let config = if cli.command.needs_config() {
        match load_config(&cli.config) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ {e}");
                process::exit(e.exit_code());
            }
        }
    } else {
        None
    };

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "bcats - Business Central availability-to-sell reporting"
    );

    let exit_code = match execute_command(&cli, config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config: Option<BcatsConfig>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Ats(args) => args.execute(required(config)?).await,
        Commands::Table(args) => args.execute(required(config)?).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}

fn required(config: Option<BcatsConfig>) -> anyhow::Result<BcatsConfig> {
    config.ok_or_else(|| anyhow::anyhow!("configuration was not loaded"))
}
