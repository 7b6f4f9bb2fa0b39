//! # arxiv-fetch
//!
//! Query the arXiv catalog and download paper PDFs.
//!
//! ## Architecture
//!
//! - [`models`]: identifiers, categories, query filters and feed records
//! - [`client`]: the query API client and the [`client::Catalog`] seam
//! - [`download`]: PDF download orchestration, single and batch
//! - [`store`]: JSON record files on disk
//! - [`config`]: layered configuration
//! - [`utils`]: HTTP client and text helpers
//! - [`ui`]: terminal output for the command-line tool
//!
//! ```no_run
//! use arxiv_fetch::{ArxivClient, QueryFilters};
//!
//! # async fn run() -> Result<(), arxiv_fetch::ArxivError> {
//! let client = ArxivClient::new()?;
//! let entries = client
//!     .query_normalized(&QueryFilters::new().category("cs.AI").title("attention"))
//!     .await?;
//! for entry in entries {
//!     println!("{}", entry.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use client::{ArxivClient, Catalog};
pub use download::{DownloadOptions, DownloadSource, Downloader};
pub use error::{ArxivError, ResolveError};
pub use models::{Category, Entry, Identifier, QueryFilters, RawEntry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
