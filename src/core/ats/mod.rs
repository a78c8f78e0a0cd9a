//! Availability-to-sell (ATS)
//!
//! - [`roles`] - Fetch and normalize the four source tables
//! - [`aggregate`] - Group, derive and pivot into a report
//! - [`report`] - The report and its table, CSV and JSON renderings
//! - [`service`] - Fetch-then-aggregate flow

pub mod aggregate;
pub mod report;
pub mod roles;
pub mod service;

pub use aggregate::{compute_ats, group_sum, AtsFigures};
pub use report::{AtsReport, ReportColumn, ReportRow};
pub use roles::{get_onhand, get_purchases, get_sales, get_warehouse_shipments};
pub use service::{AtsService, AtsTables};
