//! OData response models
//!
//! A Business Central web service answers either with a result set
//! (`value` array plus an optional `@odata.nextLink` cursor) or with an
//! `error` object carrying a code and a message.

use crate::domain::{AtsError, Record, Result};
use serde::Deserialize;
use serde_json::Value;

/// Name of the result set container in a response
pub const RESULT_SET_KEY: &str = "value";

/// One page of an OData result set
#[derive(Debug, Clone, Deserialize)]
pub struct ODataPage {
    pub value: Vec<Record>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// OData error response
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

/// OData error body
#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Validates a response document and extracts its page
///
/// # Errors
///
/// - [`AtsError::RemoteService`] when the `value` container is missing,
///   carrying `error.code` / `error.message` when the source sent them
/// - [`AtsError::InvalidResponse`] when `value` is present but is not an
///   array of objects
pub fn parse_page(body: Value) -> Result<ODataPage> {
    if body.get(RESULT_SET_KEY).is_none() {
        return Err(match serde_json::from_value::<ODataError>(body) {
            Ok(odata_error) => AtsError::remote(odata_error.error.code, odata_error.error.message),
            Err(_) => AtsError::remote(
                "MissingResultSet",
                format!("response has no '{RESULT_SET_KEY}' result set"),
            ),
        });
    }

    serde_json::from_value::<ODataPage>(body)
        .map_err(|e| AtsError::InvalidResponse(format!("malformed result set: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_page_with_next_link() {
        let page = parse_page(json!({
            "@odata.context": "https://example.com/$metadata#ItemLedgerEntries",
            "value": [{"Item_No": "1896-S"}, {"Item_No": "1900-S"}],
            "@odata.nextLink": "https://example.com/ItemLedgerEntries?$skiptoken=2"
        }))
        .unwrap();

        assert_eq!(page.value.len(), 2);
        assert_eq!(
            page.next_link.as_deref(),
            Some("https://example.com/ItemLedgerEntries?$skiptoken=2")
        );
    }

    #[test]
    fn test_parse_last_page() {
        let page = parse_page(json!({"value": []})).unwrap();
        assert!(page.value.is_empty());
        assert!(page.next_link.is_none());
    }

    #[test]
    fn test_parse_error_response() {
        let err = parse_page(json!({
            "error": {
                "code": "BadRequest_ResourceNotFound",
                "message": "Resource not found for the segment 'Foo'."
            }
        }))
        .unwrap_err();

        match err {
            AtsError::RemoteService { code, message } => {
                assert_eq!(code, "BadRequest_ResourceNotFound");
                assert_eq!(message, "Resource not found for the segment 'Foo'.");
            }
            other => panic!("Expected RemoteService error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_response_without_value_or_error() {
        let err = parse_page(json!({"unexpected": true})).unwrap_err();
        assert!(matches!(err, AtsError::RemoteService { ref code, .. } if code == "MissingResultSet"));
    }

    #[test]
    fn test_parse_malformed_value() {
        let err = parse_page(json!({"value": "not-an-array"})).unwrap_err();
        assert!(matches!(err, AtsError::InvalidResponse(_)));
    }
}
