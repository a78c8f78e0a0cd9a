//! Configuration schema types
//!
//! This module defines the configuration structure for bcats.

use crate::config::SecretString;
use crate::domain::SourceRole;
use serde::{Deserialize, Serialize};

/// Main bcats configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BcatsConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Business Central connection
    pub business_central: BusinessCentralConfig,

    /// Web service tables used for each source role
    #[serde(default)]
    pub tables: TablesConfig,

    /// Report defaults
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BcatsConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.business_central.validate()?;
        self.tables.validate()?;
        self.report.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Business Central web services configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessCentralConfig {
    /// Root of the web services API, tenant and company are appended to it
    #[serde(default = "default_api_root")]
    pub api_root: String,

    /// Tenant identifier (e.g. "cbef3105-140c-4614-b685-61d44b282736")
    pub tenant: String,

    /// Company name (e.g. "CRONUS US")
    pub company: String,

    /// Web services user
    pub username: String,

    /// Web services access key
    /// Stored securely in memory and automatically zeroized on drop
    pub password: SecretString,

    /// Page size hint sent with every request
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Maximum number of pages a single fetch may follow
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl BusinessCentralConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if !self.api_root.starts_with("http://") && !self.api_root.starts_with("https://") {
            return Err(
                "business_central.api_root must start with http:// or https://".to_string(),
            );
        }

        if self.tenant.trim().is_empty() {
            return Err("business_central.tenant cannot be empty".to_string());
        }

        if self.company.trim().is_empty() {
            return Err("business_central.company cannot be empty".to_string());
        }

        if self.username.is_empty() {
            return Err("business_central.username cannot be empty".to_string());
        }

        if self.password.expose_secret().is_empty() {
            return Err("business_central.password cannot be empty".to_string());
        }

        if !(1..=20_000).contains(&self.page_size) {
            return Err(format!(
                "business_central.page_size must be between 1 and 20000, got {}",
                self.page_size
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("business_central.timeout_seconds must be > 0".to_string());
        }

        if self.max_pages == 0 {
            return Err("business_central.max_pages must be > 0".to_string());
        }

        Ok(())
    }
}

/// Web service table names, one per source role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesConfig {
    #[serde(default = "default_purchases_table")]
    pub purchases: String,

    #[serde(default = "default_onhand_table")]
    pub onhand: String,

    #[serde(default = "default_sales_table")]
    pub sales: String,

    #[serde(default = "default_shipments_table")]
    pub shipments: String,
}

impl TablesConfig {
    /// Table configured for a role
    pub fn for_role(&self, role: SourceRole) -> &str {
        match role {
            SourceRole::Purchases => &self.purchases,
            SourceRole::OnHand => &self.onhand,
            SourceRole::Sales => &self.sales,
            SourceRole::WarehouseShipments => &self.shipments,
        }
    }

    fn validate(&self) -> Result<(), String> {
        for role in SourceRole::ALL {
            if self.for_role(role).trim().is_empty() {
                return Err(format!("tables.{role} cannot be empty"));
            }
        }
        Ok(())
    }
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            purchases: default_purchases_table(),
            onhand: default_onhand_table(),
            sales: default_sales_table(),
            shipments: default_shipments_table(),
        }
    }
}

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Aligned text table
    #[default]
    Table,
    Csv,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!(
                "Invalid report format '{other}'. Must be one of: table, csv, json"
            )),
        }
    }
}

/// Report defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Warehouses to report on (empty = every warehouse in the data)
    #[serde(default)]
    pub warehouses: Vec<String>,

    /// Output format
    #[serde(default)]
    pub format: ReportFormat,
}

impl ReportConfig {
    /// The configured filter, `None` when no warehouses are listed
    pub fn warehouse_filter(&self) -> Option<Vec<String>> {
        if self.warehouses.is_empty() {
            None
        } else {
            Some(self.warehouses.clone())
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.warehouses.iter().any(|w| w.trim().is_empty()) {
            return Err("report.warehouses cannot contain empty entries".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_root() -> String {
    "https://api.businesscentral.dynamics.com/v1.0/".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_max_pages() -> usize {
    10_000
}

fn default_purchases_table() -> String {
    SourceRole::Purchases.default_table().to_string()
}

fn default_onhand_table() -> String {
    SourceRole::OnHand.default_table().to_string()
}

fn default_sales_table() -> String {
    SourceRole::Sales.default_table().to_string()
}

fn default_shipments_table() -> String {
    SourceRole::WarehouseShipments.default_table().to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
