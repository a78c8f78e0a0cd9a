//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the bcats configuration file.

use crate::config::load_config;
use crate::domain::SourceRole;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        let bc = &config.business_central;
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  API Root: {}", bc.api_root);
        println!("  Tenant: {}", bc.tenant);
        println!("  Company: {}", bc.company);
        println!("  Username: {}", bc.username);
        println!("  Page Size: {}", bc.page_size);
        println!("  Timeout: {}s", bc.timeout_seconds);
        println!("  TLS Verify: {}", bc.tls_verify);
        println!("  Max Pages: {}", bc.max_pages);
        for role in SourceRole::ALL {
            println!("  Table ({role}): {}", config.tables.for_role(role));
        }
        println!(
            "  Warehouses: {}",
            if config.report.warehouses.is_empty() {
                "All".to_string()
            } else {
                config.report.warehouses.join(", ")
            }
        );
        println!("  Report Format: {:?}", config.report.format);
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/bcats.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[business_central]
tenant = "tenant-1"
company = "CRONUS US"
username = "ws_user"
password = "secret"
"#
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
