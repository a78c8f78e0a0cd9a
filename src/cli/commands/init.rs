//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "bcats.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing bcats configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your tenant and company", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set BCATS_BC_USERNAME and BCATS_BC_PASSWORD");
                println!("  3. Validate configuration: bcats validate-config");
                println!("  4. Run the report: bcats ats");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# bcats Configuration File
# Business Central availability-to-sell reporting

[application]
log_level = "info"

[business_central]
api_root = "https://api.businesscentral.dynamics.com/v1.0/"
tenant = "00000000-0000-0000-0000-000000000000"
company = "CRONUS US"
username = "${BCATS_BC_USERNAME}"
password = "${BCATS_BC_PASSWORD}"
page_size = 100
timeout_seconds = 60
tls_verify = true
max_pages = 10000

[tables]
purchases = "purchaseDocumentLines"
onhand = "ItemLedgerEntries"
sales = "salesDocumentLines"
shipments = "WarehouseShipmentsLines"

[report]
warehouses = []
format = "table"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# bcats Configuration File
# Business Central availability-to-sell reporting
#
# Values of the form ${VAR_NAME} are read from the environment (or a .env
# file). Every setting can also be overridden with BCATS_<SECTION>_<KEY>,
# e.g. BCATS_BUSINESS_CENTRAL_COMPANY.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Business Central Web Services
# ============================================================================
[business_central]
# OData root; the tenant and company are appended to it
api_root = "https://api.businesscentral.dynamics.com/v1.0/"

# Azure AD tenant id of the environment
tenant = "00000000-0000-0000-0000-000000000000"

# Company name exactly as shown in Business Central
company = "CRONUS US"

# Web services user and access key (basic authentication)
username = "${BCATS_BC_USERNAME}"
password = "${BCATS_BC_PASSWORD}"

# Records per page requested from the server (1-20000)
page_size = 100

# Request timeout in seconds
timeout_seconds = 60

# Verify TLS certificates (disable only for test servers)
tls_verify = true

# Upper bound on pages followed for a single table
max_pages = 10000

# ============================================================================
# Source Tables
# ============================================================================
# Published web service names for the four inputs of the report
[tables]
# Outstanding purchase order lines (PO)
purchases = "purchaseDocumentLines"

# Item ledger entries (OH)
onhand = "ItemLedgerEntries"

# Outstanding sales order lines (SO)
sales = "salesDocumentLines"

# Outstanding warehouse shipment lines (WSHIP)
shipments = "WarehouseShipmentsLines"

# ============================================================================
# Report
# ============================================================================
[report]
# Warehouses to report, in column order. Empty means every warehouse.
warehouses = ["EAST", "MAIN", "WEST"]

# Output format (table, csv, json)
format = "table"

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to the console
local_enabled = false
local_path = "./logs"

# Rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}
