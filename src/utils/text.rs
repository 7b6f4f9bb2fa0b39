//! Text cleanup for catalog fields and local filenames.

use regex::Regex;
use std::sync::OnceLock;

static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();

fn whitespace_run() -> &'static Regex {
    WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").expect("static whitespace pattern"))
}

/// Collapse every run of whitespace into a single space, then drop one
/// leading and one trailing whitespace character.
///
/// The Atom feed hard-wraps titles and abstracts, so this is applied to
/// `title`, `summary` and `title_detail.value` during normalization.
///
/// ```
/// use arxiv_fetch::utils::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  a\n\t title "), "a title");
/// assert_eq!(normalize_whitespace(" \n "), "");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = whitespace_run().replace_all(text, " ");
    let trimmed = collapsed.strip_prefix(' ').unwrap_or(&collapsed);
    let trimmed = trimmed.strip_suffix(' ').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Replace every character that is not alphanumeric or `.` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '.' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_whitespace_is_untouched() {
        for s in ["TheQuickBrownFox", "", "a", "61421.,/,./,.,/12312=309()}{"] {
            assert_eq!(normalize_whitespace(s), s);
        }
    }

    #[test]
    fn test_boundary_whitespace_removed() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace(" "), "");
        assert_eq!(normalize_whitespace("  "), "");
        assert_eq!(normalize_whitespace(" a "), "a");
        assert_eq!(normalize_whitespace(" a word "), "a word");
    }

    #[test]
    fn test_duplicate_whitespace_collapsed() {
        assert_eq!(normalize_whitespace("    very \n \tdupl"), "very dupl");
        assert_eq!(normalize_whitespace("a\r\n\r\nb"), "a b");
    }

    #[test]
    fn test_idempotent() {
        let samples = [" x  y ", "\t\tfoo\nbar  ", "plain", "   ", "a \u{a0} b"];
        for s in samples {
            let once = normalize_whitespace(s);
            assert_eq!(normalize_whitespace(&once), once);
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("1709.05312v1"), "1709.05312v1");
        assert_eq!(sanitize_filename("cmp-lg/9808001"), "cmp_lg_9808001");
        assert_eq!(sanitize_filename("Example Title"), "Example_Title");
        assert_eq!(sanitize_filename("a: b?"), "a__b_");
    }
}
