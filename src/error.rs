//! Error types.
//!
//! [`ResolveError`] covers the per-item failures a batch download recovers
//! from. Everything else in [`ArxivError`] aborts a batch.

use std::path::PathBuf;

/// Failure to work out what to download for a single item
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The input could not be parsed into a base id
    #[error("Illegal arXiv id of entry {0}")]
    InvalidIdentifier(String),

    /// A title-derived filename was requested but the lookup found nothing
    #[error("Could not find title for paper id \"{0}\"")]
    TitleLookupFailed(String),
}

/// Underlying cause of a failed catalog query
#[derive(Debug, thiserror::Error)]
pub enum QueryFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed feed: {0}")]
    Feed(#[from] FeedError),
}

/// Errors raised while reading an Atom feed
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Not an Atom feed (root element <{0}>)")]
    NotAFeed(String),

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Unexpected end of document")]
    UnexpectedEof,
}

/// Errors that can occur when querying the catalog or downloading papers
#[derive(Debug, thiserror::Error)]
pub enum ArxivError {
    /// Recoverable at batch granularity
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Directory {0} does not exist, cannot download paper")]
    DirectoryNotFound(PathBuf),

    /// The query could not be executed or its response could not be parsed
    #[error("Unable to query paper with query: {query}")]
    QueryFailed {
        query: String,
        #[source]
        cause: QueryFailure,
    },

    /// A record handed to the normalizer lacks a required field
    #[error("Record is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid timestamp in '{field}': {value}")]
    InvalidDate { field: &'static str, value: String },

    /// The document fetch failed
    #[error("Failed to download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ArxivError {
    /// Whether a batch download may record this error and continue
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ArxivError::Resolve(_))
    }

    pub(crate) fn query_failed(query: &str, cause: impl Into<QueryFailure>) -> Self {
        ArxivError::QueryFailed {
            query: query.to_string(),
            cause: cause.into(),
        }
    }
}

/// Convenience alias
pub type Result<T, E = ArxivError> = std::result::Result<T, E>;
