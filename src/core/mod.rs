//! Core business logic for bcats.
//!
//! # Modules
//!
//! - [`fetch`] - Paginated table fetching with projection and indexing
//! - [`ats`] - Availability-to-sell aggregation and reporting
//!
//! # ATS Workflow
//!
//! 1. **Fetch**: Download purchase, stock, sales and shipment lines, following
//!    every continuation cursor
//! 2. **Normalize**: Reduce each table to (sku, warehouse, quantity)
//! 3. **Aggregate**: Sum per warehouse and sku, derive ATSell and ATShip
//! 4. **Pivot**: One row per sku, one column per warehouse and metric
//!
//! # Example
//!
//! ```rust,no_run
//! use bcats::adapters::businesscentral::BusinessCentralClient;
//! use bcats::config::load_config;
//! use bcats::core::ats::AtsService;
//! use bcats::core::fetch::Fetcher;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("bcats.toml")?;
//! let client = BusinessCentralClient::new(&config.business_central)?;
//! let fetcher = Fetcher::new(&client).with_max_pages(config.business_central.max_pages);
//!
//! let service = AtsService::new(fetcher, config.tables.clone());
//! let report = service.get_ats(None, None).await?;
//!
//! println!("SKUs: {}", report.len());
//! println!("Warehouses: {}", report.warehouses().len());
//! # Ok(())
//! # }
//! ```

pub mod ats;
pub mod fetch;
