//! Table command implementation
//!
//! This module implements the `table` command for downloading a single web
//! service table with optional projection, filters and index.

use super::write_output;
use crate::adapters::businesscentral::BusinessCentralClient;
use crate::config::BcatsConfig;
use crate::core::fetch::{Fetcher, QueryOptions};
use crate::domain::{AtsError, DuplicateKeys, RecordSet, Result};
use crate::log_error_with_context;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the table command
#[derive(Args, Debug)]
pub struct TableArgs {
    /// Web service table name (e.g. ItemLedgerEntries)
    pub table: String,

    /// Fields to return, in order (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// OData filter predicate (repeatable, combined with `and`)
    #[arg(long)]
    pub filter: Vec<String>,

    /// Fields that must identify each record uniquely (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub index: Vec<String>,

    /// Allow repeated index keys, the last record winning
    #[arg(long, requires = "index")]
    pub last_wins: bool,

    /// Output format (json or csv)
    #[arg(long, default_value = "json")]
    pub format: String,

    /// Write the records to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl TableArgs {
    /// Execute the table command
    pub async fn execute(&self, config: BcatsConfig) -> anyhow::Result<i32> {
        tracing::info!(table = %self.table, "Starting table command");

        let format = self.format.to_lowercase();
        if format != "json" && format != "csv" {
            eprintln!("❌ Invalid format '{}'. Use 'json' or 'csv'", self.format);
            return Ok(2);
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

        let options = self.query_options();
        let fetched = if options.index.is_some() {
            fetcher
                .fetch_indexed(&self.table, &options)
                .await
                .map(|indexed| {
                    tracing::info!(keys = indexed.len(), key_fields = ?indexed.key_fields(), "Indexed records");
                    indexed.into_records()
                })
        } else {
            fetcher.fetch(&self.table, &options).await
        };

        let records = match fetched {
            Ok(records) => records,
            Err(e) => {
                log_error_with_context!(&e, "Table download failed");
                eprintln!("❌ Failed to download {}: {e}", self.table);
                return Ok(e.exit_code());
            }
        };

        let rendered = if format == "csv" {
            records_to_csv(&records)?
        } else {
            serde_json::to_string_pretty(&records)?
        };
        write_output(self.output.as_deref(), &rendered)?;

        if let Some(ref path) = self.output {
            eprintln!("✅ Wrote {} records to {}", records.len(), path.display());
        }

        Ok(0)
    }

    fn query_options(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        if !self.fields.is_empty() {
            options = options.fields(self.fields.iter().cloned());
        }
        for predicate in &self.filter {
            options = options.filter(predicate.clone());
        }
        if !self.index.is_empty() {
            options = options.index(self.index.iter().cloned());
        }
        if self.last_wins {
            options = options.on_duplicate(DuplicateKeys::LastWins);
        }
        options
    }
}

/// CSV with one column per record field, absent values left empty
fn records_to_csv(records: &RecordSet) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(records.columns())?;
    for row in records.iter() {
        wtr.write_record(row.values().iter().map(|v| v.to_string()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AtsError::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AtsError::Serialization(e.to_string()))
}
