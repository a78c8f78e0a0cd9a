//! Microsoft Business Central adapter
//!
//! OData v4 web services client and response models.

pub mod client;
pub mod models;

pub use client::BusinessCentralClient;
pub use models::{parse_page, ODataError, ODataPage};
