//! Terminal output helpers for the command-line tool.
//!
//! Colored status lines, entry tables and the batch download progress bar.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::models::{Entry, RawEntry};
use crate::utils::normalize_whitespace;

/// Width used when the terminal size cannot be determined
pub const DEFAULT_WIDTH: usize = 100;

/// Get the current terminal width.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
    }
}

/// Print a styled status line to stderr.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg),
    }
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }

    let total_width = unicode_width::UnicodeWidthStr::width(text);
    if total_width <= max_width {
        return text.to_string();
    }

    let budget = max_width - 3;
    let mut width = 0;
    let mut truncated = String::new();
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(1);
        if width + w > budget {
            break;
        }
        width += w;
        truncated.push(c);
    }

    if truncated.is_empty() {
        return "...".to_string();
    }
    format!("{}...", truncated)
}

/// Get a human-readable file size.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// One table row's worth of display fields
struct Row {
    id: String,
    title: String,
    authors: String,
    categories: String,
    published: String,
}

impl From<&Entry> for Row {
    fn from(entry: &Entry) -> Self {
        Row {
            id: entry
                .identifier()
                .map(|id| id.canonical())
                .unwrap_or_default(),
            title: entry.title.clone(),
            authors: entry.author_names().join(", "),
            categories: entry.tags.join(" "),
            published: entry.published.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&RawEntry> for Row {
    fn from(entry: &RawEntry) -> Self {
        Row {
            id: entry
                .identifier()
                .map(|id| id.canonical())
                .unwrap_or_default(),
            title: entry
                .title
                .as_deref()
                .map(normalize_whitespace)
                .unwrap_or_default(),
            authors: entry
                .authors
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            categories: entry
                .tags
                .iter()
                .flatten()
                .map(|t| t.term.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            published: entry
                .published
                .as_deref()
                .map(|d| d.chars().take(10).collect())
                .unwrap_or_default(),
        }
    }
}

fn build_table(rows: Vec<Row>) -> Table {
    let title_width = terminal_width().saturating_sub(70).clamp(30, 80);

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Title", "Authors", "Categories", "Published"]);

    for row in rows {
        table.add_row(vec![
            Cell::new(row.id).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&row.title, title_width)),
            Cell::new(truncate_with_ellipsis(&row.authors, 30)),
            Cell::new(truncate_with_ellipsis(&row.categories, 20)),
            Cell::new(row.published),
        ]);
    }
    table
}

/// Table of normalized entries
pub fn entries_table(entries: &[Entry]) -> Table {
    build_table(entries.iter().map(Row::from).collect())
}

/// Table of raw records
pub fn raw_entries_table(entries: &[RawEntry]) -> Table {
    build_table(entries.iter().map(Row::from).collect())
}

/// Progress bar for a batch of downloads.
pub struct BatchProgress {
    pb: ProgressBar,
}

impl BatchProgress {
    /// Create a bar for `len` items; hidden when `visible` is false.
    pub fn new(len: u64, visible: bool) -> Self {
        let pb = if visible {
            ProgressBar::new(len)
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::with_template(
            "{msg}: {bar:40.cyan/blue} {pos}/{len} ({percent}%)",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ");
        pb.set_style(style);
        pb.set_message("Downloading");

        Self { pb }
    }

    /// Record a finished item, printing its failure above the bar.
    pub fn item_done(&self, item: &str, error: Option<&str>) {
        if let Some(error) = error {
            self.pb.println(format!(
                "{} {}: {}",
                status_icon(Status::Error).red().bold(),
                item,
                error
            ));
        }
        self.pb.inc(1);
    }

    pub fn finish(&self, failed: usize) {
        let msg = if failed == 0 {
            "Done".to_string()
        } else {
            format!("Done, {} failed", failed)
        };
        self.pb.finish_with_message(msg);
    }

    pub fn position(&self) -> u64 {
        self.pb.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::make_entry;

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Warning), "⚠");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("Hello", 10), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Hello", 3), "...");
        assert_eq!(truncate_with_ellipsis("日本語テキスト", 9), "日本語...");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(500), "500 B");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1048576), "1.00 MB");
    }

    #[test]
    fn test_raw_entries_table() {
        let mut entry = make_entry("1709.05312v1", "A\n  Long Title");
        entry.published = Some("2017-09-15T17:37:05Z".to_string());
        let rendered = raw_entries_table(&[entry]).to_string();
        assert!(rendered.contains("1709.05312v1"));
        assert!(rendered.contains("A Long Title"));
        assert!(rendered.contains("2017-09-15"));
    }

    #[test]
    fn test_batch_progress_counts_items() {
        let progress = BatchProgress::new(3, false);
        progress.item_done("a", None);
        progress.item_done("b", Some("invalid identifier"));
        progress.finish(1);
        assert_eq!(progress.position(), 2);
    }
}
