//! Domain models and types for bcats.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed keys** ([`Sku`], [`WarehouseCode`])
//! - **Fetched data** ([`RecordSet`], [`IndexedRecordSet`], [`FieldValue`])
//! - **Inventory lines** ([`NormalizedLine`], [`SourceRole`], [`Metric`])
//! - **Error types** ([`AtsError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! All fallible operations return `Result<T, AtsError>`:
//!
//! ```rust,no_run
//! use bcats::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = bcats::config::load_config("bcats.toml")?;
//!     println!("{}", config.business_central.company);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod line;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::AtsError;
pub use ids::{Sku, WarehouseCode};
pub use line::{Metric, NormalizedLine, SourceRole};
pub use record::{DuplicateKeys, FieldValue, IndexedRecordSet, Record, RecordSet, Row};
pub use result::Result;
