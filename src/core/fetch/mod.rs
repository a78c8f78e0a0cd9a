//! Paginated table fetching
//!
//! [`Fetcher`] drains a [`Pager`] to completion and turns the accumulated
//! records into a [`RecordSet`]. A failure on any page fails the whole call and
//! nothing accumulated so far is returned.

pub mod options;
pub mod pager;

#[cfg(test)]
pub(crate) mod testing;

pub use options::QueryOptions;
pub use pager::{Pager, DEFAULT_MAX_PAGES};

use crate::adapters::RecordSource;
use crate::domain::{AtsError, IndexedRecordSet, Record, RecordSet, Result};
use crate::log_fetch_complete;
use std::time::Instant;

/// Fetches whole tables from a record source
///
/// # Example
///
/// ```no_run
/// use bcats::adapters::businesscentral::BusinessCentralClient;
/// use bcats::config::load_config;
/// use bcats::core::fetch::{Fetcher, QueryOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("bcats.toml")?;
/// let client = BusinessCentralClient::new(&config.business_central)?;
/// let fetcher = Fetcher::new(&client);
///
/// let options = QueryOptions::new()
///     .fields(["Item_No", "Location_Code", "Quantity"])
///     .filter("Quantity ne 0");
/// let records = fetcher.fetch("ItemLedgerEntries", &options).await?;
/// println!("{} records", records.len());
/// # Ok(())
/// # }
/// ```
pub struct Fetcher<'a> {
    source: &'a dyn RecordSource,
    max_pages: usize,
}

impl<'a> Fetcher<'a> {
    pub fn new(source: &'a dyn RecordSource) -> Self {
        Self {
            source,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Lazy page sequence for callers that consume pages one at a time
    pub fn pager(&self, table: &str, options: &QueryOptions) -> Pager<'a> {
        Pager::new(self.source, table, options).with_max_pages(self.max_pages)
    }

    /// Fetches every record of `table` matching `options`
    ///
    /// Null and empty-string values come back as absent. With
    /// [`QueryOptions::fields`] set, the result has exactly those columns in
    /// that order, even when no record matched.
    ///
    /// # Errors
    ///
    /// - [`AtsError::RemoteService`] if any page is an error document
    /// - [`AtsError::PageLimitExceeded`] if the cursor chain exceeds the page bound
    /// - [`AtsError::Shape`] if a requested field is missing from the records
    pub async fn fetch(&self, table: &str, options: &QueryOptions) -> Result<RecordSet> {
        let set = self.collect(table, options).await?;
        match &options.fields {
            Some(fields) if !fields.is_empty() => set.project(fields),
            _ => Ok(set),
        }
    }

    /// Fetches `table` and keys the result by [`QueryOptions::index`]
    ///
    /// The key fields need not be among [`QueryOptions::fields`]: they are
    /// added to `$select` and the result has the key columns followed by the
    /// remaining requested fields.
    ///
    /// # Errors
    ///
    /// Everything [`Fetcher::fetch`] returns, plus [`AtsError::Validation`] when
    /// no index is set and [`AtsError::DuplicateKey`] under
    /// [`crate::domain::DuplicateKeys::Reject`].
    pub async fn fetch_indexed(
        &self,
        table: &str,
        options: &QueryOptions,
    ) -> Result<IndexedRecordSet> {
        let index = options
            .index
            .as_ref()
            .filter(|fields| !fields.is_empty())
            .ok_or_else(|| AtsError::Validation("an index needs at least one field".to_string()))?;

        // Key fields are always selected, the requested fields are picked
        // from what remains once the key is built
        let requested = options.fields.as_ref().filter(|fields| !fields.is_empty());
        let query = match requested {
            Some(fields) => options.clone().fields(key_and_fields(index, fields)),
            None => options.clone(),
        };

        let indexed = self
            .collect(table, &query)
            .await?
            .index_by(index, options.on_duplicate)?;

        match requested {
            Some(fields) => indexed.project(&key_and_fields(index, fields)),
            None => Ok(indexed),
        }
    }

    /// Drains every page of `table` into one record set
    async fn collect(&self, table: &str, options: &QueryOptions) -> Result<RecordSet> {
        let start = Instant::now();
        let mut pager = self.pager(table, options);
        let mut records: Vec<Record> = Vec::new();

        tracing::debug!(
            source = %self.source.base_url(),
            table = %table,
            "Fetching table"
        );

        while let Some(page) = pager.next_page().await? {
            records.extend(page);
        }

        log_fetch_complete!(table, pager.pages_fetched(), records.len(), start.elapsed());

        Ok(RecordSet::from_records(records))
    }
}

/// Key fields first, then the requested fields that are not part of the key
fn key_and_fields(index: &[String], fields: &[String]) -> Vec<String> {
    index
        .iter()
        .chain(fields.iter().filter(|field| !index.contains(field)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedSource;
    use super::*;
    use crate::adapters::SourceRequest;
    use crate::domain::{DuplicateKeys, FieldValue};
    use serde_json::json;

    const NEXT: &str = "https://bc.example/salesDocumentLines?$skiptoken=abc";

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_two_pages_are_concatenated() {
        let source = ScriptedSource::new()
            .with_table(
                "salesDocumentLines",
                json!({"value": [{"number": "A"}], "@odata.nextLink": NEXT}),
            )
            .with_link(NEXT, json!({"value": [{"number": "B"}]}));

        let records = Fetcher::new(&source)
            .fetch("salesDocumentLines", &QueryOptions::new())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records.get(0, "number"), Some(&FieldValue::Text("A".to_string())));
        assert_eq!(records.get(1, "number"), Some(&FieldValue::Text("B".to_string())));
    }

    #[tokio::test]
    async fn test_missing_result_set_is_remote_error() {
        let source = ScriptedSource::new().with_table(
            "salesDocumentLines",
            json!({"error": {"code": "BadRequest", "message": "Invalid filter"}}),
        );

        let err = Fetcher::new(&source)
            .fetch("salesDocumentLines", &QueryOptions::new())
            .await
            .unwrap_err();

        match err {
            AtsError::RemoteService { code, message } => {
                assert_eq!(code, "BadRequest");
                assert_eq!(message, "Invalid filter");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_on_later_page_discards_everything() {
        let source = ScriptedSource::new()
            .with_table(
                "salesDocumentLines",
                json!({"value": [{"number": "A"}], "@odata.nextLink": NEXT}),
            )
            .with_link(
                NEXT,
                json!({"error": {"code": "Internal_ServerError", "message": "timeout"}}),
            );

        let result = Fetcher::new(&source)
            .fetch("salesDocumentLines", &QueryOptions::new())
            .await;

        assert!(matches!(result, Err(AtsError::RemoteService { .. })));
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn test_projection_restricts_and_orders_fields() {
        let source = ScriptedSource::new().with_table(
            "ItemLedgerEntries",
            json!({"value": [
                {"Quantity": 4, "Location_Code": "EAST", "Item_No": "1896-S"}
            ]}),
        );

        let options = QueryOptions::new().fields(["Item_No", "Location_Code"]);
        let records = Fetcher::new(&source)
            .fetch("ItemLedgerEntries", &options)
            .await
            .unwrap();

        assert_eq!(records.columns(), &fields(&["Item_No", "Location_Code"])[..]);
        assert_eq!(records.row(0).unwrap().values().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_result_keeps_requested_fields() {
        let source = ScriptedSource::new().with_table("ItemLedgerEntries", json!({"value": []}));

        let options = QueryOptions::new().fields(["Item_No", "Location_Code", "Quantity"]);
        let records = Fetcher::new(&source)
            .fetch("ItemLedgerEntries", &options)
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(
            records.columns(),
            &fields(&["Item_No", "Location_Code", "Quantity"])[..]
        );
    }

    #[tokio::test]
    async fn test_page_limit_fails_the_fetch() {
        let source = ScriptedSource::new()
            .with_table(
                "salesDocumentLines",
                json!({"value": [{"number": "A"}], "@odata.nextLink": NEXT}),
            )
            .with_link(NEXT, json!({"value": [{"number": "B"}], "@odata.nextLink": NEXT}));

        let result = Fetcher::new(&source)
            .with_max_pages(5)
            .fetch("salesDocumentLines", &QueryOptions::new())
            .await;

        assert!(matches!(result, Err(AtsError::PageLimitExceeded(5))));
        assert_eq!(source.request_count(), 5);
    }

    #[tokio::test]
    async fn test_fetch_indexed_lookup() {
        let source = ScriptedSource::new().with_table(
            "ItemLedgerEntries",
            json!({"value": [
                {"Item_No": "A", "Location_Code": "EAST", "Quantity": 1},
                {"Item_No": "A", "Location_Code": "WEST", "Quantity": 2}
            ]}),
        );

        let options = QueryOptions::new().index(["Item_No", "Location_Code"]);
        let indexed = Fetcher::new(&source)
            .fetch_indexed("ItemLedgerEntries", &options)
            .await
            .unwrap();

        let row = indexed.get(&["A", "WEST"]).unwrap();
        assert_eq!(row.get("Quantity"), Some(&FieldValue::Number(2.0)));
    }

    #[tokio::test]
    async fn test_fetch_indexed_duplicate_policy() {
        let source = ScriptedSource::new().with_table(
            "ItemLedgerEntries",
            json!({"value": [
                {"Item_No": "A", "Quantity": 1},
                {"Item_No": "A", "Quantity": 2}
            ]}),
        );
        let fetcher = Fetcher::new(&source);

        let rejected = fetcher
            .fetch_indexed("ItemLedgerEntries", &QueryOptions::new().index(["Item_No"]))
            .await;
        assert!(matches!(rejected, Err(AtsError::DuplicateKey(_))));

        let last_wins = fetcher
            .fetch_indexed(
                "ItemLedgerEntries",
                &QueryOptions::new()
                    .index(["Item_No"])
                    .on_duplicate(DuplicateKeys::LastWins),
            )
            .await
            .unwrap();
        assert_eq!(
            last_wins.get(&["A"]).unwrap().get("Quantity"),
            Some(&FieldValue::Number(2.0))
        );
    }

    #[tokio::test]
    async fn test_fetch_indexed_requires_index() {
        let source = ScriptedSource::new();
        let result = Fetcher::new(&source)
            .fetch_indexed("ItemLedgerEntries", &QueryOptions::new())
            .await;

        assert!(matches!(result, Err(AtsError::Validation(_))));
        assert_eq!(source.request_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_indexed_key_outside_requested_fields() {
        let source = ScriptedSource::new().with_table(
            "ItemLedgerEntries",
            json!({"value": [
                {"Item_No": "A", "Location_Code": "EAST", "Quantity": 1},
                {"Item_No": "B", "Location_Code": "WEST", "Quantity": 2}
            ]}),
        );

        let options = QueryOptions::new().fields(["Quantity"]).index(["Item_No"]);
        let indexed = Fetcher::new(&source)
            .fetch_indexed("ItemLedgerEntries", &options)
            .await
            .unwrap();

        assert_eq!(
            indexed.get(&["B"]).unwrap().get("Quantity"),
            Some(&FieldValue::Number(2.0))
        );
        assert_eq!(
            indexed.records().columns(),
            &fields(&["Item_No", "Quantity"])[..]
        );

        // The key field is requested from the server alongside the fields
        match &source.requests()[0] {
            SourceRequest::Query { params, .. } => {
                assert!(params.contains(&("$select".to_string(), "Item_No,Quantity".to_string())));
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_indexed_empty_result() {
        let source = ScriptedSource::new().with_table("ItemLedgerEntries", json!({"value": []}));

        let options = QueryOptions::new().fields(["Quantity"]).index(["Item_No"]);
        let indexed = Fetcher::new(&source)
            .fetch_indexed("ItemLedgerEntries", &options)
            .await
            .unwrap();

        assert!(indexed.is_empty());
        assert_eq!(
            indexed.records().columns(),
            &fields(&["Item_No", "Quantity"])[..]
        );
    }
}
