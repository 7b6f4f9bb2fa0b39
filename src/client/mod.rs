//! Remote query client for the arXiv catalog.
//!
//! [`Catalog`] is the seam the download orchestrator looks titles up through;
//! [`ArxivClient`] implements it against the real query API and
//! [`MockCatalog`] returns canned records in tests.

mod feed;
pub mod mock;

pub use feed::{parse_feed, Feed};
pub use mock::MockCatalog;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::HttpConfig;
use crate::error::{ArxivError, QueryFailure};
use crate::models::{Entry, QueryFilters, RawEntry};
use crate::utils::HttpClient;

/// Anything that can answer a catalog query
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    /// Run a single query and return the raw records in feed order
    async fn query(&self, filters: &QueryFilters) -> Result<Vec<RawEntry>, ArxivError>;
}

/// Client for the arXiv query API
#[derive(Debug, Clone)]
pub struct ArxivClient {
    http: HttpClient,
    query_url: String,
}

impl ArxivClient {
    /// Create a client for the public API with default settings
    pub fn new() -> Result<Self, ArxivError> {
        Self::from_config(&HttpConfig::default())
    }

    /// Create a client from the `[http]` configuration section
    pub fn from_config(config: &HttpConfig) -> Result<Self, ArxivError> {
        Ok(Self::with_client(
            HttpClient::from_config(config)?,
            &config.query_url,
        ))
    }

    /// Create with a custom HTTP client and endpoint (for testing)
    pub fn with_client(http: HttpClient, query_url: impl Into<String>) -> Self {
        Self {
            http,
            query_url: query_url.into(),
        }
    }

    /// Query endpoint this client talks to
    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    /// Issue the request and parse the whole feed, including paging metadata.
    ///
    /// Transport errors, non-2xx responses and malformed bodies all surface as
    /// [`ArxivError::QueryFailed`] carrying the attempted query string.
    pub async fn fetch_feed(&self, filters: &QueryFilters) -> Result<Feed, ArxivError> {
        let query = filters.to_query_string();
        let url = format!("{}?{}", self.query_url, query);
        debug!(%url, "querying catalog");

        let response = self
            .http
            .client()
            .get(&url)
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| ArxivError::query_failed(&query, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArxivError::query_failed(&query, QueryFailure::Status(status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ArxivError::query_failed(&query, e))?;

        let feed = parse_feed(&body).map_err(|e| ArxivError::query_failed(&query, e))?;
        debug!(entries = feed.entries.len(), total = ?feed.total_results, "feed parsed");
        Ok(feed)
    }

    /// Query and normalize every returned record
    pub async fn query_normalized(&self, filters: &QueryFilters) -> Result<Vec<Entry>, ArxivError> {
        self.query(filters)
            .await?
            .into_iter()
            .map(RawEntry::normalize)
            .collect()
    }

    /// Collect up to `total` records with consecutive paged requests.
    ///
    /// Pages of `per_page` records are requested one after another, starting
    /// at `filters.start` (or 0). Stops early when a page comes back empty.
    pub async fn harvest(
        &self,
        filters: &QueryFilters,
        total: usize,
        per_page: usize,
    ) -> Result<Vec<RawEntry>, ArxivError> {
        let per_page = per_page.max(1);
        let first = filters.start.unwrap_or(0);
        let mut entries = Vec::new();

        let mut offset = 0;
        while offset < total {
            let page_size = per_page.min(total - offset);
            let page = filters
                .clone()
                .start(first + offset)
                .max_results(page_size);

            let batch = self.query(&page).await?;
            info!(
                start = first + offset,
                received = batch.len(),
                "harvested page"
            );
            if batch.is_empty() {
                break;
            }
            entries.extend(batch);
            offset += page_size;
        }

        Ok(entries)
    }
}

#[async_trait]
impl Catalog for ArxivClient {
    async fn query(&self, filters: &QueryFilters) -> Result<Vec<RawEntry>, ArxivError> {
        Ok(self.fetch_feed(filters).await?.entries)
    }
}
