//! Business Central web services client
//!
//! Implements [`RecordSource`] over the OData v4 web services endpoint of a
//! Business Central company:
//! `{api_root}{tenant}/ODataV4/Company('{company}')/{table}`.

use crate::adapters::source::{RecordSource, SourceRequest};
use crate::config::BusinessCentralConfig;
use crate::domain::{AtsError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Annotation preference sent alongside the page size hint
const ANNOTATIONS_PREFERENCE: &str =
    "odata.include-annotations=OData.Community.Display.V1.FormattedValue";

/// Longest response body excerpt quoted in an error
const BODY_EXCERPT_LEN: usize = 200;

/// Business Central OData client
///
/// Credentials are turned into a `Basic` authorization header once, at
/// construction, and sent with every request including continuation cursors.
///
/// # Example
///
/// ```no_run
/// use bcats::adapters::businesscentral::BusinessCentralClient;
/// use bcats::adapters::{RecordSource, SourceRequest};
/// use bcats::config::load_config;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("bcats.toml")?;
/// let client = BusinessCentralClient::new(&config.business_central)?;
/// let body = client
///     .send(&SourceRequest::query("ItemLedgerEntries", vec![]))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct BusinessCentralClient {
    /// Company endpoint, always ending with '/'
    company_url: Url,

    /// HTTP client carrying the protocol and authorization headers
    client: Client,
}

impl BusinessCentralClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint URL or the credential
    /// header cannot be built, or the HTTP client fails to initialize.
    pub fn new(config: &BusinessCentralConfig) -> Result<Self> {
        let company_url = company_url(&config.api_root, &config.tenant, &config.company)?;

        let mut headers = protocol_headers(config.page_size)?;
        let mut auth = HeaderValue::from_str(&basic_auth_value(
            &config.username,
            config.password.expose_secret().as_ref(),
        ))
        .map_err(|e| AtsError::Configuration(format!("Invalid credentials: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let mut client_builder = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| AtsError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        tracing::debug!(
            company_url = %company_url,
            username = %config.username,
            page_size = config.page_size,
            "Business Central client created"
        );

        Ok(Self {
            company_url,
            client,
        })
    }

    /// Full URL of a table, with query parameters
    pub fn table_url(&self, table: &str, params: &[(String, String)]) -> Result<Url> {
        let mut url = self.company_url.join(table).map_err(|e| {
            AtsError::Configuration(format!("Invalid table name '{table}': {e}"))
        })?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    fn request_url(&self, request: &SourceRequest) -> Result<Url> {
        match request {
            SourceRequest::Query { table, params } => self.table_url(table, params),
            SourceRequest::Continuation { url } => Url::parse(url).map_err(|e| {
                AtsError::InvalidResponse(format!("Invalid continuation link '{url}': {e}"))
            }),
        }
    }
}

#[async_trait]
impl RecordSource for BusinessCentralClient {
    async fn send(&self, request: &SourceRequest) -> Result<Value> {
        let url = self.request_url(request)?;

        tracing::debug!(url = %url, "GET");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AtsError::Connection(format!("GET {url} failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AtsError::Connection(format!("Failed to read response body: {e}")))?;

        // Error responses carry a JSON error object; hand it back so the caller
        // can report the source's own code and message.
        serde_json::from_str::<Value>(&body).map_err(|e| {
            let excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
            AtsError::InvalidResponse(format!(
                "Response with status {status} is not JSON ({e}): {excerpt}"
            ))
        })
    }

    fn base_url(&self) -> &str {
        self.company_url.as_str()
    }
}

/// Builds the company endpoint URL
fn company_url(api_root: &str, tenant: &str, company: &str) -> Result<Url> {
    let root = if api_root.ends_with('/') {
        api_root.to_string()
    } else {
        format!("{api_root}/")
    };

    Url::parse(&format!("{root}{tenant}/ODataV4/Company('{company}')/"))
        .map_err(|e| AtsError::Configuration(format!("Invalid Business Central endpoint: {e}")))
}

/// OData protocol headers, one value per name
fn protocol_headers(page_size: u32) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("odata-version"),
        HeaderValue::from_static("4.0"),
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );

    // Both preferences travel in a single Prefer header.
    let prefer = format!("odata.maxpagesize={page_size}, {ANNOTATIONS_PREFERENCE}");
    headers.insert(
        HeaderName::from_static("prefer"),
        HeaderValue::from_str(&prefer)
            .map_err(|e| AtsError::Configuration(format!("Invalid Prefer header: {e}")))?,
    );

    Ok(headers)
}

fn basic_auth_value(username: &str, password: &str) -> String {
    let credentials = format!("{username}:{password}");
    let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
    format!("Basic {encoded}")
}
