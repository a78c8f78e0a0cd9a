//! Cursor-following pager
//!
//! A [`Pager`] yields one page per call and only issues a request when asked,
//! so pages can be consumed lazily. The first request carries the query
//! parameters; every following request is the continuation cursor verbatim.

use super::options::QueryOptions;
use crate::adapters::businesscentral::parse_page;
use crate::adapters::{RecordSource, SourceRequest};
use crate::domain::{AtsError, Record, Result};
use futures::stream::{self, Stream};

/// Default upper bound on pages followed by one pager
pub const DEFAULT_MAX_PAGES: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PagerState {
    Start,
    Next(String),
    Done,
}

/// Lazy, restartable sequence of pages for one table query
pub struct Pager<'a> {
    source: &'a dyn RecordSource,
    table: String,
    params: Vec<(String, String)>,
    state: PagerState,
    pages_fetched: usize,
    max_pages: usize,
}

impl<'a> Pager<'a> {
    pub fn new(source: &'a dyn RecordSource, table: impl Into<String>, options: &QueryOptions) -> Self {
        Self {
            source,
            table: table.into(),
            params: options.to_params(),
            state: PagerState::Start,
            pages_fetched: 0,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Fail instead of following more than `max_pages` pages
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Pages successfully fetched since the last (re)start
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// True once the last page was returned or an error ended the sequence
    pub fn is_exhausted(&self) -> bool {
        self.state == PagerState::Done
    }

    /// Rewinds to the first page; the next call re-issues the original query
    pub fn restart(&mut self) {
        self.state = PagerState::Start;
        self.pages_fetched = 0;
    }

    /// Fetches the next page, `None` once the source sent no further cursor
    ///
    /// Any error ends the sequence; call [`Pager::restart`] to try again.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Record>>> {
        let request = match &self.state {
            PagerState::Start => SourceRequest::query(self.table.clone(), self.params.clone()),
            PagerState::Next(url) => SourceRequest::continuation(url.clone()),
            PagerState::Done => return Ok(None),
        };

        if self.pages_fetched >= self.max_pages {
            self.state = PagerState::Done;
            return Err(AtsError::PageLimitExceeded(self.max_pages));
        }

        let page = match self.source.send(&request).await.and_then(parse_page) {
            Ok(page) => page,
            Err(e) => {
                self.state = PagerState::Done;
                tracing::debug!(
                    table = %self.table,
                    page = self.pages_fetched + 1,
                    error = %e,
                    "Page request failed"
                );
                return Err(e);
            }
        };

        self.pages_fetched += 1;
        tracing::debug!(
            table = %self.table,
            page = self.pages_fetched,
            records = page.value.len(),
            has_next = page.next_link.is_some(),
            "Fetched page"
        );

        self.state = match page.next_link {
            Some(link) => PagerState::Next(link),
            None => PagerState::Done,
        };

        Ok(Some(page.value))
    }

    /// Turns the pager into a stream of pages
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<Record>>> + 'a {
        stream::try_unfold(self, |mut pager| async move {
            Ok(pager.next_page().await?.map(|page| (page, pager)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetch::testing::ScriptedSource;
    use futures::TryStreamExt;
    use serde_json::json;

    fn two_page_source() -> ScriptedSource {
        ScriptedSource::new()
            .with_table(
                "ItemLedgerEntries",
                json!({
                    "value": [{"Item_No": "A"}],
                    "@odata.nextLink": "https://bc.example/ItemLedgerEntries?$skiptoken=1"
                }),
            )
            .with_link(
                "https://bc.example/ItemLedgerEntries?$skiptoken=1",
                json!({"value": [{"Item_No": "B"}]}),
            )
    }

    #[tokio::test]
    async fn test_pages_are_fetched_on_demand() {
        let source = two_page_source();
        let mut pager = Pager::new(&source, "ItemLedgerEntries", &QueryOptions::new());

        assert_eq!(source.request_count(), 0);

        let first = pager.next_page().await.unwrap().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(source.request_count(), 1);
        assert!(!pager.is_exhausted());

        let second = pager.next_page().await.unwrap().unwrap();
        assert_eq!(second[0]["Item_No"], "B");
        assert!(pager.is_exhausted());

        assert!(pager.next_page().await.unwrap().is_none());
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn test_continuation_does_not_resend_params() {
        let source = two_page_source();
        let options = QueryOptions::new().filter("Quantity ne 0");
        let mut pager = Pager::new(&source, "ItemLedgerEntries", &options);

        while pager.next_page().await.unwrap().is_some() {}

        let requests = source.requests();
        assert_eq!(
            requests[0],
            SourceRequest::query(
                "ItemLedgerEntries",
                vec![("$filter".to_string(), "Quantity ne 0".to_string())]
            )
        );
        assert_eq!(
            requests[1],
            SourceRequest::continuation("https://bc.example/ItemLedgerEntries?$skiptoken=1")
        );
    }

    #[tokio::test]
    async fn test_restart_reissues_the_query() {
        let source = two_page_source();
        let mut pager = Pager::new(&source, "ItemLedgerEntries", &QueryOptions::new());

        pager.next_page().await.unwrap();
        pager.restart();
        assert_eq!(pager.pages_fetched(), 0);

        let first = pager.next_page().await.unwrap().unwrap();
        assert_eq!(first[0]["Item_No"], "A");
        assert!(matches!(source.requests()[1], SourceRequest::Query { .. }));
    }

    #[tokio::test]
    async fn test_page_limit() {
        let source = two_page_source();
        let mut pager =
            Pager::new(&source, "ItemLedgerEntries", &QueryOptions::new()).with_max_pages(1);

        assert!(pager.next_page().await.unwrap().is_some());
        let err = pager.next_page().await.unwrap_err();
        assert!(matches!(err, AtsError::PageLimitExceeded(1)));
        assert!(pager.is_exhausted());
        assert_eq!(source.request_count(), 1);
    }

    #[tokio::test]
    async fn test_error_ends_sequence() {
        let source = ScriptedSource::new().with_table(
            "Broken",
            json!({"error": {"code": "Internal_ServerError", "message": "boom"}}),
        );
        let mut pager = Pager::new(&source, "Broken", &QueryOptions::new());

        let err = pager.next_page().await.unwrap_err();
        assert!(matches!(err, AtsError::RemoteService { .. }));
        assert!(pager.next_page().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stream_yields_every_page() {
        let source = two_page_source();
        let pages: Vec<Vec<Record>> = Pager::new(&source, "ItemLedgerEntries", &QueryOptions::new())
            .into_stream()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(pages.len(), 2);
    }
}
