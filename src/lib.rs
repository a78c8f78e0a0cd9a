// bcats - Business Central Availability-to-Sell Reporting
// Copyright (c) 2025 bcats Contributors
// Licensed under the MIT License

//! # bcats - Business Central availability-to-sell reporting
//!
//! bcats downloads inventory documents from the OData web services of a
//! Microsoft Dynamics 365 Business Central company and computes, per SKU and
//! warehouse, how much stock is available to sell and to ship.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Fetching** whole tables through OData pagination (`@odata.nextLink`)
//! - **Normalizing** purchase, stock, sales and shipment lines to one schema
//! - **Aggregating** them into an ATS report pivoted by SKU and warehouse
//! - **Rendering** the report as a text table, CSV or JSON
//!
//! ## Architecture
//!
//! bcats follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (fetch, ATS aggregation)
//! - [`adapters`] - External integrations (Business Central)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bcats::adapters::businesscentral::BusinessCentralClient;
//! use bcats::config::load_config;
//! use bcats::core::ats::AtsService;
//! use bcats::core::fetch::Fetcher;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("bcats.toml")?;
//!     let client = BusinessCentralClient::new(&config.business_central)?;
//!
//!     let service = AtsService::new(Fetcher::new(&client), config.tables.clone());
//!     let report = service.get_ats(None, None).await?;
//!
//!     print!("{}", report.render_table());
//!     Ok(())
//! }
//! ```
//!
//! ## Aggregation
//!
//! Lines are summed per (warehouse, sku). Warehouse shipments are deducted
//! from both stock on hand and open sales, then:
//!
//! - `ATSell = PO + OH - SO`
//! - `ATShip = min(ATSell, OH)`
//!
//! Negative figures are reported as-is.
//!
//! ```rust
//! use bcats::core::ats::compute_ats;
//! use bcats::domain::{Metric, NormalizedLine, SourceRole};
//!
//! let onhand = vec![NormalizedLine::parse("1896-S", "EAST", SourceRole::OnHand, Some(3.0)).unwrap()];
//! let sales = vec![NormalizedLine::parse("1896-S", "EAST", SourceRole::Sales, Some(5.0)).unwrap()];
//!
//! let report = compute_ats(&[], &onhand, &sales, &[], None);
//! assert_eq!(report.value("1896-S", Metric::AtSell, "EAST"), Some(-2.0));
//! ```
//!
//! ## Error Handling
//!
//! bcats uses the [`domain::AtsError`] type for all errors:
//!
//! ```rust,no_run
//! use bcats::domain::AtsError;
//!
//! fn example() -> Result<(), AtsError> {
//!     let config = bcats::config::load_config("bcats.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
