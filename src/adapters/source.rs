//! Record source trait definition
//!
//! The fetcher only needs one thing from the outside world: run a GET-style
//! request and hand back the JSON document. Transport, authentication and
//! protocol headers live behind this trait.

use crate::domain::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A request the fetcher asks a source to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRequest {
    /// First page of a table, with query parameters
    Query {
        table: String,
        params: Vec<(String, String)>,
    },
    /// A continuation cursor exactly as the source returned it
    ///
    /// The cursor already encodes the original query, so no parameters are re-sent.
    Continuation { url: String },
}

impl SourceRequest {
    pub fn query(table: impl Into<String>, params: Vec<(String, String)>) -> Self {
        SourceRequest::Query {
            table: table.into(),
            params,
        }
    }

    pub fn continuation(url: impl Into<String>) -> Self {
        SourceRequest::Continuation { url: url.into() }
    }
}

/// Trait for record sources
///
/// Implementations return the parsed JSON body for both successful and
/// error responses, so the fetcher can surface the source's own error code
/// and message. Transport failures are returned as [`crate::domain::AtsError::Connection`]
/// and are never retried.
///
/// # Example
///
/// ```no_run
/// use bcats::adapters::{RecordSource, SourceRequest};
///
/// # async fn example(source: &dyn RecordSource) -> bcats::domain::Result<()> {
/// let request = SourceRequest::query("ItemLedgerEntries", vec![]);
/// let body = source.send(&request).await?;
/// println!("{}", body["value"]);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Execute one request and return the response document
    async fn send(&self, request: &SourceRequest) -> Result<Value>;

    /// Human-readable location of the source, for logs
    fn base_url(&self) -> &str;
}
