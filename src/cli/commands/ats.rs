//! ATS command implementation
//!
//! This module implements the `ats` command, which downloads the four source
//! tables and prints the availability-to-sell report.

use super::write_output;
use crate::adapters::businesscentral::BusinessCentralClient;
use crate::config::{BcatsConfig, ReportFormat};
use crate::core::ats::{AtsService, AtsTables};
use crate::core::fetch::Fetcher;
use crate::domain::WarehouseCode;
use crate::log_error_with_context;
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the ats command
#[derive(Args, Debug)]
pub struct AtsArgs {
    /// Warehouses to report, in column order (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub warehouses: Option<Vec<String>>,

    /// Output format (table, csv, json)
    #[arg(short, long)]
    pub format: Option<ReportFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the purchase lines table
    #[arg(long)]
    pub purchases_table: Option<String>,

    /// Override the item ledger entries table
    #[arg(long)]
    pub onhand_table: Option<String>,

    /// Override the sales lines table
    #[arg(long)]
    pub sales_table: Option<String>,

    /// Override the warehouse shipment lines table
    #[arg(long)]
    pub shipments_table: Option<String>,
}

impl AtsArgs {
    /// Execute the ats command
    pub async fn execute(&self, config: BcatsConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting ats command");

        let warehouses = match self.warehouse_filter(&config) {
            Ok(warehouses) => warehouses,
            Err(e) => {
                eprintln!("❌ Invalid warehouse list: {e}");
                return Ok(2); // Configuration error exit code
            }
        };
        let tables = self.tables(&config);
        let format = self.format.unwrap_or(config.report.format);

        if let Some(ref warehouses) = warehouses {
            tracing::info!(warehouses = ?warehouses, "Restricting report to warehouses");
        }

        let client = match BusinessCentralClient::new(&config.business_central) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create Business Central client");
                eprintln!("❌ Failed to initialize client: {e}");
                return Ok(e.exit_code());
            }
        };

        let fetcher = Fetcher::new(&client).with_max_pages(config.business_central.max_pages);
        let service = AtsService::new(fetcher, config.tables.clone());

        let report = match service.get_ats(warehouses.as_deref(), Some(&tables)).await {
            Ok(report) => report,
            Err(e) => {
                log_error_with_context!(&e, "Availability computation failed");
                eprintln!("❌ Availability computation failed: {e}");
                return Ok(e.exit_code());
            }
        };

        let rendered = report.render(format, Utc::now())?;
        write_output(self.output.as_deref(), &rendered)?;

        if let Some(ref path) = self.output {
            eprintln!(
                "✅ Wrote {} SKUs across {} warehouses to {}",
                report.len(),
                report.warehouses().len(),
                path.display()
            );
        }

        Ok(0)
    }

    /// CLI warehouses win over the configured default list
    fn warehouse_filter(
        &self,
        config: &BcatsConfig,
    ) -> Result<Option<Vec<WarehouseCode>>, String> {
        let codes = match &self.warehouses {
            Some(codes) => Some(codes.clone()),
            None => config.report.warehouse_filter(),
        };

        codes
            .map(|codes| {
                codes
                    .iter()
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty())
                    .map(WarehouseCode::new)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
    }

    fn tables(&self, config: &BcatsConfig) -> AtsTables {
        let mut tables = config.tables.clone();
        let overrides = [
            (&mut tables.purchases, &self.purchases_table),
            (&mut tables.onhand, &self.onhand_table),
            (&mut tables.sales, &self.sales_table),
            (&mut tables.shipments, &self.shipments_table),
        ];
        for (table, override_name) in overrides {
            if let Some(name) = override_name {
                tracing::info!(table = %name, "Overriding table from CLI");
                *table = name.clone();
            }
        }
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn config() -> BcatsConfig {
        parse_config(
            r#"
[business_central]
tenant = "tenant-1"
company = "CRONUS US"
username = "ws_user"
password = "secret"

[report]
warehouses = ["EAST", "MAIN"]
"#,
        )
        .unwrap()
    }

    fn args() -> AtsArgs {
        AtsArgs {
            warehouses: None,
            format: None,
            output: None,
            purchases_table: None,
            onhand_table: None,
            sales_table: None,
            shipments_table: None,
        }
    }

    #[test]
    fn test_configured_warehouses_are_default() {
        let filter = args().warehouse_filter(&config()).unwrap().unwrap();
        let codes: Vec<&str> = filter.iter().map(|w| w.as_str()).collect();
        assert_eq!(codes, vec!["EAST", "MAIN"]);
    }

    #[test]
    fn test_cli_warehouses_override_config() {
        let args = AtsArgs {
            warehouses: Some(vec!["WEST".to_string(), " ".to_string()]),
            ..args()
        };
        let filter = args.warehouse_filter(&config()).unwrap().unwrap();
        assert_eq!(filter, vec![WarehouseCode::new("WEST").unwrap()]);
    }

    #[test]
    fn test_table_overrides() {
        let args = AtsArgs {
            sales_table: Some("customSalesLines".to_string()),
            ..args()
        };
        let tables = args.tables(&config());
        assert_eq!(tables.sales, "customSalesLines");
        assert_eq!(tables.onhand, "ItemLedgerEntries");
    }
}
