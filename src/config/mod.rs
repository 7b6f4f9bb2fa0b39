//! Configuration management.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `ARXIV_FETCH_` (nested keys use `__`,
//! e.g. `ARXIV_FETCH_HTTP__TIMEOUT_SECS=120`).
//!
//! ```toml
//! [http]
//! query_url = "http://export.arxiv.org/api/query"
//! pdf_url = "https://arxiv.org/pdf"
//! timeout_secs = 60
//! connect_timeout_secs = 10
//!
//! [downloads]
//! default_path = "./papers"
//! use_title_for_filename = true
//! append_id = true
//! overwrite = false
//!
//! [logging]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::default_user_agent;

/// Name of the per-user configuration directory and local file stem
pub const APP_NAME: &str = "arxiv-fetch";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ARXIV_FETCH";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub downloads: DownloadConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Endpoints and network settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Query API endpoint
    #[serde(default = "default_query_url")]
    pub query_url: String,

    /// Base URL PDFs are fetched from (`<pdf_url>/<id>.pdf`)
    #[serde(default = "default_pdf_url")]
    pub pdf_url: String,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            query_url: default_query_url(),
            pdf_url: default_pdf_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_query_url() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_pdf_url() -> String {
    "https://arxiv.org/pdf".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

/// Download configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Default download directory
    #[serde(default = "default_download_dir")]
    pub default_path: PathBuf,

    /// Name files after the paper title instead of its id
    #[serde(default)]
    pub use_title_for_filename: bool,

    /// Append the id to title-derived file names
    #[serde(default)]
    pub append_id: bool,

    /// Replace files that already exist
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            default_path: default_download_dir(),
            use_title_for_filename: false,
            append_id: false,
            overwrite: true,
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` for structured output, anything else for human-readable
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    /// Write the configuration as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Default location of the per-user configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
}

/// Find a configuration file: `./arxiv-fetch.toml`, then the per-user file
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(format!("{}.toml", APP_NAME));
    if local.is_file() {
        return Some(local);
    }
    default_config_path().filter(|path| path.is_file())
}
