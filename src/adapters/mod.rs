//! External system integrations for bcats.
//!
//! - [`source`] - The [`RecordSource`] trait the fetcher depends on
//! - [`businesscentral`] - Microsoft Business Central OData web services
//!
//! # Design Pattern
//!
//! Adapters isolate transport, authentication and protocol headers behind a
//! trait so the fetch and aggregation core can be exercised with in-memory
//! sources.
//!
//! ```rust,no_run
//! use bcats::adapters::businesscentral::BusinessCentralClient;
//! use bcats::config::{secret_string, BusinessCentralConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BusinessCentralConfig {
//!     api_root: "https://api.businesscentral.dynamics.com/v1.0/".to_string(),
//!     tenant: "cbef3105-140c-4614-b685-61d44b282736".to_string(),
//!     company: "CRONUS US".to_string(),
//!     username: "ws_user".to_string(),
//!     password: secret_string("access-key".to_string()),
//!     page_size: 100,
//!     timeout_seconds: 60,
//!     tls_verify: true,
//!     max_pages: 10_000,
//! };
//!
//! let client = BusinessCentralClient::new(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod businesscentral;
pub mod source;

pub use source::{RecordSource, SourceRequest};
