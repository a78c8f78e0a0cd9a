//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for bcats using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// bcats - Business Central availability-to-sell reporting
#[derive(Parser, Debug)]
#[command(name = "bcats")]
#[command(version, about, long_about = None)]
#[command(author = "bcats Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "bcats.toml", env = "BCATS_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BCATS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the availability-to-sell report
    Ats(commands::ats::AtsArgs),

    /// Download one web service table
    Table(commands::table::TableArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether the command needs a loaded configuration
    pub fn needs_config(&self) -> bool {
        matches!(self, Commands::Ats(_) | Commands::Table(_))
    }
}
