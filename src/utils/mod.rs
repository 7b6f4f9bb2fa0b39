//! Utility modules supporting catalog operations.
//!
//! - [`HttpClient`]: reqwest client configured with timeouts
//! - [`normalize_whitespace`]: collapse whitespace in feed text fields
//! - [`sanitize_filename`]: make a title or id safe to use as a file name
//!
//! ```rust
//! use arxiv_fetch::utils::sanitize_filename;
//!
//! assert_eq!(sanitize_filename("Example Title"), "Example_Title");
//! ```

mod http;
mod text;

pub use http::{default_user_agent, HttpClient};
pub use text::{normalize_whitespace, sanitize_filename};
