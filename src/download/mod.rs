//! PDF download orchestration.
//!
//! [`Downloader::download_one`] resolves an identifier, picks a file name,
//! checks the target directory and streams the PDF to disk.
//! [`Downloader::download_many`] runs it over a list of inputs, recording
//! per-item resolution failures and continuing with the next item.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::client::{ArxivClient, Catalog};
use crate::config::{DownloadConfig, HttpConfig};
use crate::error::{ArxivError, ResolveError};
use crate::models::{Entry, Identifier, QueryFilters, RawEntry};
use crate::utils::{sanitize_filename, HttpClient};

/// Extension appended to every downloaded document
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// What to download: an id, an abstract URL or a catalog record
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadSource {
    /// Bare or versioned id, e.g. `1709.05312v1`
    Id(String),

    /// Abstract page URL, e.g. `https://arxiv.org/abs/1709.05312v1`
    Uri(String),

    /// Record straight from the feed
    Raw(RawEntry),

    /// Normalized record
    Entry(Entry),
}

impl DownloadSource {
    /// Classify a command-line style input as an id or a URI
    pub fn parse_input(input: &str) -> Self {
        if input.contains("://") {
            DownloadSource::Uri(input.to_string())
        } else {
            DownloadSource::Id(input.to_string())
        }
    }

    /// Identifier of the paper, if one can be resolved
    pub fn identifier(&self) -> Option<Identifier> {
        match self {
            DownloadSource::Id(s) | DownloadSource::Uri(s) => Identifier::parse(s),
            DownloadSource::Raw(entry) => entry.identifier(),
            DownloadSource::Entry(entry) => entry.identifier(),
        }
    }

    /// Title carried by the source itself (records only)
    pub fn title(&self) -> Option<&str> {
        match self {
            DownloadSource::Id(_) | DownloadSource::Uri(_) => None,
            DownloadSource::Raw(entry) => entry.title.as_deref(),
            DownloadSource::Entry(entry) => Some(&entry.title),
        }
    }
}

impl fmt::Display for DownloadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadSource::Id(s) | DownloadSource::Uri(s) => f.write_str(s),
            DownloadSource::Raw(RawEntry { id: Some(id), .. })
            | DownloadSource::Entry(Entry { id: Some(id), .. }) => write!(f, "record {}", id),
            DownloadSource::Raw(_) | DownloadSource::Entry(_) => f.write_str("record without id"),
        }
    }
}

impl From<&str> for DownloadSource {
    fn from(input: &str) -> Self {
        DownloadSource::parse_input(input)
    }
}

impl From<String> for DownloadSource {
    fn from(input: String) -> Self {
        DownloadSource::parse_input(&input)
    }
}

impl From<RawEntry> for DownloadSource {
    fn from(entry: RawEntry) -> Self {
        DownloadSource::Raw(entry)
    }
}

impl From<Entry> for DownloadSource {
    fn from(entry: Entry) -> Self {
        DownloadSource::Entry(entry)
    }
}

/// How to name and write a downloaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Explicit file name (without extension), used verbatim
    pub target_filename: Option<String>,

    /// Name the file after the paper title; may cost one catalog query
    pub use_title_for_filename: bool,

    /// With a title-derived name, append the canonical id
    pub append_id: bool,

    /// Replace an existing file; otherwise keep it and skip the fetch
    pub overwrite: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            target_filename: None,
            use_title_for_filename: false,
            append_id: false,
            overwrite: true,
        }
    }
}

impl DownloadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options taken from the `[downloads]` configuration section
    pub fn from_config(config: &DownloadConfig) -> Self {
        Self {
            target_filename: None,
            use_title_for_filename: config.use_title_for_filename,
            append_id: config.append_id,
            overwrite: config.overwrite,
        }
    }

    pub fn target_filename(mut self, name: impl Into<String>) -> Self {
        self.target_filename = Some(name.into());
        self
    }

    pub fn use_title_for_filename(mut self, enabled: bool) -> Self {
        self.use_title_for_filename = enabled;
        self
    }

    pub fn append_id(mut self, enabled: bool) -> Self {
        self.append_id = enabled;
        self
    }

    pub fn overwrite(mut self, enabled: bool) -> Self {
        self.overwrite = enabled;
        self
    }
}

/// Downloads PDFs from the document endpoint
#[derive(Debug, Clone)]
pub struct Downloader {
    catalog: Arc<dyn Catalog>,
    http: HttpClient,
    pdf_url: String,
}

impl Downloader {
    /// Create a downloader that looks titles up through `catalog` and fetches
    /// documents from `<pdf_url>/<id>.pdf`
    pub fn new(catalog: Arc<dyn Catalog>, http: HttpClient, pdf_url: impl Into<String>) -> Self {
        Self {
            catalog,
            http,
            pdf_url: pdf_url.into(),
        }
    }

    /// Create a downloader backed by the real query API
    pub fn from_config(config: &HttpConfig) -> Result<Self, ArxivError> {
        let http = HttpClient::from_config(config)?;
        let catalog = ArxivClient::with_client(http.clone(), &config.query_url);
        Ok(Self::new(Arc::new(catalog), http, &config.pdf_url))
    }

    /// URL of the document for `id`
    pub fn document_url(&self, id: &Identifier) -> String {
        format!(
            "{}/{}.{}",
            self.pdf_url.trim_end_matches('/'),
            id.canonical(),
            DOCUMENT_EXTENSION
        )
    }

    /// Pick the file name (without extension) for `source`.
    ///
    /// An explicit name wins and is used verbatim. Otherwise the title (from
    /// the source, or looked up by id) or the canonical id is sanitized.
    pub async fn resolve_filename(
        &self,
        source: &DownloadSource,
        id: &Identifier,
        options: &DownloadOptions,
    ) -> Result<String, ArxivError> {
        if let Some(name) = options.target_filename.as_deref().filter(|n| !n.is_empty()) {
            return Ok(name.to_string());
        }

        let canonical = id.canonical();
        if !options.use_title_for_filename {
            return Ok(sanitize_filename(&canonical));
        }

        let title = match source.title() {
            Some(title) => title.to_string(),
            None => self.lookup_title(&canonical).await?,
        };

        let name = if options.append_id {
            format!("{}{}", title, canonical)
        } else {
            title
        };
        Ok(sanitize_filename(&name))
    }

    async fn lookup_title(&self, canonical: &str) -> Result<String, ArxivError> {
        let filters = QueryFilters::by_ids([canonical]).max_results(1);
        let entries = self.catalog.query(&filters).await?;
        entries
            .into_iter()
            .next()
            .and_then(|entry| entry.title)
            .ok_or_else(|| ResolveError::TitleLookupFailed(canonical.to_string()).into())
    }

    /// Download a single paper into `target_dir`, returning the written path.
    ///
    /// Fails with [`ResolveError::InvalidIdentifier`] when no id can be
    /// resolved, [`ResolveError::TitleLookupFailed`] when a title-derived name
    /// was requested but the catalog has no record, and
    /// [`ArxivError::DirectoryNotFound`] before any document request when the
    /// target directory is missing.
    pub async fn download_one(
        &self,
        source: &DownloadSource,
        target_dir: &Path,
        options: &DownloadOptions,
    ) -> Result<PathBuf, ArxivError> {
        let id = source
            .identifier()
            .ok_or_else(|| ResolveError::InvalidIdentifier(source.to_string()))?;

        let filename = self.resolve_filename(source, &id, options).await?;
        debug!(id = %id, %filename, "resolved file name");

        let is_dir = tokio::fs::metadata(target_dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(ArxivError::DirectoryNotFound(target_dir.to_path_buf()));
        }

        let path = target_dir.join(format!("{}.{}", filename, DOCUMENT_EXTENSION));
        if !options.overwrite && tokio::fs::try_exists(&path).await? {
            info!(path = %path.display(), "file exists, skipping");
            return Ok(path);
        }

        let url = self.document_url(&id);
        let bytes = self.fetch_to_file(&url, &path).await?;
        info!(id = %id, path = %path.display(), bytes, "downloaded");
        Ok(path)
    }

    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64, ArxivError> {
        debug!(%url, "fetching document");
        let failed = |reason: String| ArxivError::DownloadFailed {
            url: url.to_string(),
            reason,
        };

        let mut response = self
            .http
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(format!("status {}", response.status())));
        }

        let mut file = tokio::fs::File::create(path).await?;
        let written = async {
            let mut total = 0u64;
            while let Some(chunk) = response.chunk().await.map_err(|e| failed(e.to_string()))? {
                file.write_all(&chunk).await?;
                total += chunk.len() as u64;
            }
            file.flush().await?;
            Ok::<u64, ArxivError>(total)
        }
        .await;

        if written.is_err() {
            drop(file);
            let _ = tokio::fs::remove_file(path).await;
        }
        written
    }

    /// Download several papers one after another.
    ///
    /// Identifier and file name resolution failures are collected and the
    /// batch continues; any other error aborts it. `progress` is called once
    /// per processed item, in input order, with the captured error if the
    /// item failed. The explicit `target_filename` of `options` is ignored.
    pub async fn download_many<F>(
        &self,
        sources: &[DownloadSource],
        target_dir: &Path,
        options: &DownloadOptions,
        mut progress: F,
    ) -> Result<Vec<ResolveError>, ArxivError>
    where
        F: FnMut(&DownloadSource, Option<&ResolveError>),
    {
        let options = DownloadOptions {
            target_filename: None,
            ..options.clone()
        };
        let mut failures = Vec::new();

        for source in sources {
            match self.download_one(source, target_dir, &options).await {
                Ok(_) => progress(source, None),
                Err(ArxivError::Resolve(err)) => {
                    warn!(item = %source, error = %err, "skipping item");
                    progress(source, Some(&err));
                    failures.push(err);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::{make_entry, MockCatalog};
    use tempfile::tempdir;

    const PDF_BYTES: &[u8] = b"%PDF-1.4 test document";

    fn downloader(server: &mockito::ServerGuard, catalog: Arc<MockCatalog>) -> Downloader {
        Downloader::new(
            catalog,
            HttpClient::new().unwrap(),
            format!("{}/pdf", server.url()),
        )
    }

    #[test]
    fn test_source_identifier_and_title() {
        let source = DownloadSource::from("https://arxiv.org/abs/1709.05312v2");
        assert!(matches!(source, DownloadSource::Uri(_)));
        let id = source.identifier().unwrap();
        assert_eq!(id.canonical(), "1709.05312v2");
        assert!(source.title().is_none());

        let record = DownloadSource::from(make_entry("1709.05312", "Some Title"));
        assert_eq!(record.title(), Some("Some Title"));
        assert_eq!(record.identifier().unwrap().base, "1709.05312");

        let bare = DownloadSource::Raw(RawEntry::default());
        assert!(bare.identifier().is_none());
        assert_eq!(bare.to_string(), "record without id");
    }

    #[tokio::test]
    async fn test_download_by_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pdf/1709.05312.pdf")
            .with_status(200)
            .with_body(PDF_BYTES)
            .create_async()
            .await;
        let catalog = Arc::new(MockCatalog::new());
        let dir = tempdir().unwrap();

        let path = downloader(&server, catalog.clone())
            .download_one(&"1709.05312".into(), dir.path(), &DownloadOptions::new())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(path, dir.path().join("1709.05312.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), PDF_BYTES);
        assert!(catalog.queries().is_empty());
    }

    #[tokio::test]
    async fn test_title_lookup_with_appended_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/pdf/1709.05312v1.pdf")
            .with_status(200)
            .with_body(PDF_BYTES)
            .create_async()
            .await;
        let catalog = Arc::new(MockCatalog::with_entries(vec![make_entry(
            "1709.05312v1",
            "Example Title",
        )]));
        let dir = tempdir().unwrap();

        let options = DownloadOptions::new()
            .use_title_for_filename(true)
            .append_id(true);
        let path = downloader(&server, catalog.clone())
            .download_one(&"1709.05312v1".into(), dir.path(), &options)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(path, dir.path().join("Example_Title1709.05312v1.pdf"));

        let queries = catalog.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].ids, vec!["1709.05312v1"]);
        assert_eq!(queries[0].max_results, 1);
    }

    #[tokio::test]
    async fn test_title_from_record_skips_lookup() {
        let server = mockito::Server::new_async().await;
        let catalog = Arc::new(MockCatalog::new());
        let downloader = downloader(&server, catalog.clone());

        let record = RawEntry {
            id: Some("some id".to_string()),
            title: Some("some title".to_string()),
            ..Default::default()
        };
        let id = Identifier::new("some id", None);
        let options = DownloadOptions::new().use_title_for_filename(true);

        let filename = downloader
            .resolve_filename(&record.into(), &id, &options)
            .await
            .unwrap();

        assert_eq!(filename, "some_title");
        assert_eq!(
            downloader.document_url(&id),
            format!("{}/pdf/some id.pdf", server.url())
        );
        assert!(catalog.queries().is_empty());
    }

    #[tokio::test]
    async fn test_wrapped_title_used_as_is() {
        let server = mockito::Server::new_async().await;
        let downloader = downloader(&server, Arc::new(MockCatalog::new()));

        let record = RawEntry {
            id: Some("http://arxiv.org/abs/1709.05312v1".to_string()),
            title: Some("Example\n  Title".to_string()),
            ..Default::default()
        };
        let id = Identifier::new("1709.05312", Some("1".to_string()));

        let filename = downloader
            .resolve_filename(
                &record.clone().into(),
                &id,
                &DownloadOptions::new().use_title_for_filename(true),
            )
            .await
            .unwrap();
        assert_eq!(filename, "Example___Title");

        let filename = downloader
            .resolve_filename(
                &record.into(),
                &id,
                &DownloadOptions::new()
                    .use_title_for_filename(true)
                    .append_id(true),
            )
            .await
            .unwrap();
        assert_eq!(filename, "Example___Title1709.05312v1");
    }

    #[tokio::test]
    async fn test_explicit_filename_wins() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pdf/1709.05312.pdf")
            .with_status(200)
            .with_body(PDF_BYTES)
            .create_async()
            .await;
        let catalog = Arc::new(MockCatalog::new());
        let dir = tempdir().unwrap();

        let options = DownloadOptions::new()
            .target_filename("final filename")
            .use_title_for_filename(true);
        let path = downloader(&server, catalog.clone())
            .download_one(&"1709.05312".into(), dir.path(), &options)
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("final filename.pdf"));
        assert!(catalog.queries().is_empty());
    }

    #[tokio::test]
    async fn test_title_lookup_failure() {
        let server = mockito::Server::new_async().await;
        let catalog = Arc::new(MockCatalog::new());
        let dir = tempdir().unwrap();

        let err = downloader(&server, catalog)
            .download_one(
                &"id_that_definitely_does_not_exist".into(),
                dir.path(),
                &DownloadOptions::new().use_title_for_filename(true),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ArxivError::Resolve(ResolveError::TitleLookupFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_directory_fails_before_fetch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does").join("not").join("exist");

        let err = downloader(&server, Arc::new(MockCatalog::new()))
            .download_one(&"1".into(), &missing, &DownloadOptions::new())
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, ArxivError::DirectoryNotFound(path) if path == missing));
    }

    #[tokio::test]
    async fn test_invalid_identifier() {
        let server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();

        let err = downloader(&server, Arc::new(MockCatalog::new()))
            .download_one(&DownloadSource::Raw(RawEntry::default()), dir.path(), &DownloadOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ArxivError::Resolve(ResolveError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_no_file() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/pdf/1709.05312.pdf")
            .with_status(404)
            .create_async()
            .await;
        let dir = tempdir().unwrap();

        let err = downloader(&server, Arc::new(MockCatalog::new()))
            .download_one(&"1709.05312".into(), dir.path(), &DownloadOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ArxivError::DownloadFailed { .. }));
        assert!(!dir.path().join("1709.05312.pdf").exists());
    }

    #[tokio::test]
    async fn test_existing_file_kept_without_overwrite() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let dir = tempdir().unwrap();
        let existing = dir.path().join("1709.05312.pdf");
        std::fs::write(&existing, b"old").unwrap();

        let path = downloader(&server, Arc::new(MockCatalog::new()))
            .download_one(
                &"1709.05312".into(),
                dir.path(),
                &DownloadOptions::new().overwrite(false),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(path, existing);
        assert_eq!(std::fs::read(&existing).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_download_many_isolates_failures() {
        let mut server = mockito::Server::new_async().await;
        let a = server
            .mock("GET", "/pdf/a.pdf")
            .with_status(200)
            .with_body(PDF_BYTES)
            .create_async()
            .await;
        let c = server
            .mock("GET", "/pdf/c.pdf")
            .with_status(200)
            .with_body(PDF_BYTES)
            .create_async()
            .await;
        let dir = tempdir().unwrap();

        let sources = vec![
            DownloadSource::from("a"),
            DownloadSource::from(""),
            DownloadSource::from("c"),
        ];
        let mut seen = Vec::new();
        let failures = downloader(&server, Arc::new(MockCatalog::new()))
            .download_many(&sources, dir.path(), &DownloadOptions::new(), |item, err| {
                seen.push((item.to_string(), err.cloned()));
            })
            .await
            .unwrap();

        a.assert_async().await;
        c.assert_async().await;
        assert_eq!(failures, vec![ResolveError::InvalidIdentifier(String::new())]);
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), None),
                (String::new(), Some(ResolveError::InvalidIdentifier(String::new()))),
                ("c".to_string(), None),
            ]
        );
    }

    #[tokio::test]
    async fn test_download_many_aborts_on_missing_directory() {
        let server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let mut calls = 0;

        let result = downloader(&server, Arc::new(MockCatalog::new()))
            .download_many(
                &["1".into(), "2".into()],
                &missing,
                &DownloadOptions::new(),
                |_, _| calls += 1,
            )
            .await;

        assert!(matches!(result, Err(ArxivError::DirectoryNotFound(_))));
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_download_many_propagates_query_failure() {
        let server = mockito::Server::new_async().await;
        let dir = tempdir().unwrap();
        let catalog = Arc::new(MockCatalog::new());
        catalog.fail_queries();

        let result = downloader(&server, catalog.clone())
            .download_many(
                &["1".into(), "2".into()],
                dir.path(),
                &DownloadOptions::new().use_title_for_filename(true),
                |_, _| {},
            )
            .await;

        assert!(matches!(result, Err(ArxivError::QueryFailed { .. })));
        assert_eq!(catalog.queries().len(), 1);
    }
}
