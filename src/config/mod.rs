//! Configuration management for bcats.
//!
//! TOML configuration with `${VAR_NAME}` environment substitution,
//! `BCATS_*` environment overrides, defaults for optional settings and
//! validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bcats::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("bcats.toml")?;
//! println!("Company: {}", config.business_central.company);
//! println!("On-hand table: {}", config.tables.onhand);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [business_central]
//! tenant = "cbef3105-140c-4614-b685-61d44b282736"
//! company = "CRONUS US"
//! username = "ws_user"
//! password = "${BCATS_BC_PASSWORD}"
//!
//! [tables]
//! onhand = "ItemLedgerEntries"
//!
//! [report]
//! warehouses = ["EAST", "MAIN"]
//! format = "table"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, BcatsConfig, BusinessCentralConfig, LoggingConfig, ReportConfig,
    ReportFormat, TablesConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
