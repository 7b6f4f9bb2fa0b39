//! Mock catalog for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::client::Catalog;
use crate::error::{ArxivError, FeedError};
use crate::models::{QueryFilters, RawEntry};

/// A catalog that returns predefined records and remembers what it was asked.
#[derive(Debug, Default)]
pub struct MockCatalog {
    response: Mutex<Vec<RawEntry>>,
    fail: Mutex<bool>,
    queries: Mutex<Vec<QueryFilters>>,
}

impl MockCatalog {
    /// Create a mock that answers every query with no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that answers every query with `entries`.
    pub fn with_entries(entries: Vec<RawEntry>) -> Self {
        let mock = Self::new();
        mock.set_response(entries);
        mock
    }

    /// Set the records to return.
    pub fn set_response(&self, entries: Vec<RawEntry>) {
        *self.response.lock().unwrap() = entries;
    }

    /// Make every subsequent query fail with [`ArxivError::QueryFailed`].
    pub fn fail_queries(&self) {
        *self.fail.lock().unwrap() = true;
    }

    /// Filters of every query received so far.
    pub fn queries(&self) -> Vec<QueryFilters> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn query(&self, filters: &QueryFilters) -> Result<Vec<RawEntry>, ArxivError> {
        self.queries.lock().unwrap().push(filters.clone());
        if *self.fail.lock().unwrap() {
            return Err(ArxivError::query_failed(
                &filters.to_query_string(),
                FeedError::UnexpectedEof,
            ));
        }
        Ok(self.response.lock().unwrap().clone())
    }
}

/// Helper to create a raw record carrying only an id and a title.
pub fn make_entry(id: &str, title: &str) -> RawEntry {
    RawEntry {
        id: Some(format!("http://arxiv.org/abs/{}", id)),
        title: Some(title.to_string()),
        ..Default::default()
    }
}
