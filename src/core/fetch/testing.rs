//! Scripted in-memory record source for unit tests

use crate::adapters::{RecordSource, SourceRequest};
use crate::domain::{AtsError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Returns canned documents keyed by table name or continuation URL, and
/// records every request it receives
#[derive(Default)]
pub struct ScriptedSource {
    tables: HashMap<String, Value>,
    links: HashMap<String, Value>,
    requests: Mutex<Vec<SourceRequest>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: &str, body: Value) -> Self {
        self.tables.insert(table.to_string(), body);
        self
    }

    pub fn with_link(mut self, url: &str, body: Value) -> Self {
        self.links.insert(url.to_string(), body);
        self
    }

    pub fn requests(&self) -> Vec<SourceRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    async fn send(&self, request: &SourceRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.clone());

        let body = match request {
            SourceRequest::Query { table, .. } => self.tables.get(table),
            SourceRequest::Continuation { url } => self.links.get(url),
        };

        body.cloned()
            .ok_or_else(|| AtsError::Connection(format!("no scripted response for {request:?}")))
    }

    fn base_url(&self) -> &str {
        "memory://scripted/"
    }
}
