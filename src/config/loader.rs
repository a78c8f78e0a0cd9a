//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BcatsConfig;
use super::secret::secret_string;
use crate::domain::errors::AtsError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BcatsConfig
/// 4. Applies environment variable overrides (BCATS_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is not set, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use bcats::config::loader::load_config;
///
/// let config = load_config("bcats.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BcatsConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AtsError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AtsError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_config(&contents)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Parses, overrides and validates configuration text
pub fn parse_config(contents: &str) -> Result<BcatsConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: BcatsConfig = toml::from_str(&contents)
        .map_err(|e| AtsError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| AtsError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AtsError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AtsError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using BCATS_* prefix
///
/// Environment variables follow the pattern: BCATS_<SECTION>_<KEY>
/// For example: BCATS_BUSINESS_CENTRAL_COMPANY, BCATS_TABLES_ONHAND
fn apply_env_overrides(config: &mut BcatsConfig) {
    if let Ok(val) = std::env::var("BCATS_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    let bc = &mut config.business_central;
    if let Ok(val) = std::env::var("BCATS_BUSINESS_CENTRAL_API_ROOT") {
        bc.api_root = val;
    }
    if let Ok(val) = std::env::var("BCATS_BUSINESS_CENTRAL_TENANT") {
        bc.tenant = val;
    }
    if let Ok(val) = std::env::var("BCATS_BUSINESS_CENTRAL_COMPANY") {
        bc.company = val;
    }
    if let Ok(val) = std::env::var("BCATS_BUSINESS_CENTRAL_USERNAME") {
        bc.username = val;
    }
    if let Ok(val) = std::env::var("BCATS_BUSINESS_CENTRAL_PASSWORD") {
        bc.password = secret_string(val);
    }
    if let Ok(val) = std::env::var("BCATS_BUSINESS_CENTRAL_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            bc.page_size = size;
        }
    }
    if let Ok(val) = std::env::var("BCATS_BUSINESS_CENTRAL_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            bc.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("BCATS_BUSINESS_CENTRAL_MAX_PAGES") {
        if let Ok(max_pages) = val.parse() {
            bc.max_pages = max_pages;
        }
    }
    if let Ok(val) = std::env::var("BCATS_BUSINESS_CENTRAL_TLS_VERIFY") {
        bc.tls_verify = val.parse().unwrap_or(true);
    }

    if let Ok(val) = std::env::var("BCATS_TABLES_PURCHASES") {
        config.tables.purchases = val;
    }
    if let Ok(val) = std::env::var("BCATS_TABLES_ONHAND") {
        config.tables.onhand = val;
    }
    if let Ok(val) = std::env::var("BCATS_TABLES_SALES") {
        config.tables.sales = val;
    }
    if let Ok(val) = std::env::var("BCATS_TABLES_SHIPMENTS") {
        config.tables.shipments = val;
    }

    if let Ok(val) = std::env::var("BCATS_REPORT_WAREHOUSES") {
        config.report.warehouses = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Ok(val) = std::env::var("BCATS_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("BCATS_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
