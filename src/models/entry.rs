//! Catalog records: raw feed entries and their normalized form.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Identifier;
use crate::error::ArxivError;
use crate::utils::normalize_whitespace;

/// Text construct with its declared content type (`type` attribute)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDetail {
    pub value: Option<String>,

    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

/// Category descriptor as it appears on an Atom entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub term: String,
    pub scheme: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub affiliation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub title: Option<String>,
}

/// A record as returned by the query API, before normalization.
///
/// Every field is optional so partial records (hand-built, or from other
/// sources) can be represented; [`RawEntry::normalize`] validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub title_detail: Option<TextDetail>,
    pub summary: Option<String>,
    pub summary_detail: Option<TextDetail>,
    #[serde(default)]
    pub authors: Vec<Author>,
    pub tags: Option<Vec<Tag>>,
    #[serde(default)]
    pub links: Vec<Link>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub comment: Option<String>,
    pub journal_ref: Option<String>,
    pub doi: Option<String>,
    pub primary_category: Option<String>,
}

/// A validated record with cleaned text and typed timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Option<String>,
    pub title: String,
    pub title_detail: TextDetail,
    pub summary: String,
    pub summary_detail: Option<TextDetail>,
    pub authors: Vec<Author>,
    pub tags: Vec<String>,
    pub links: Vec<Link>,
    pub published: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub comment: Option<String>,
    pub journal_ref: Option<String>,
    pub doi: Option<String>,
    pub primary_category: Option<String>,
}

impl RawEntry {
    /// Identifier parsed from the `id` field, if any
    pub fn identifier(&self) -> Option<Identifier> {
        self.id.as_deref().and_then(Identifier::parse)
    }

    /// Convert into a normalized [`Entry`].
    ///
    /// Tags become plain terms, timestamps are parsed and `title`, `summary`
    /// and `title_detail.value` get their whitespace collapsed. Fails with
    /// [`ArxivError::MissingField`] if `tags`, `published`, `updated`,
    /// `title`, `summary` or `title_detail` is absent.
    pub fn normalize(self) -> Result<Entry, ArxivError> {
        let tags = self.tags.ok_or(ArxivError::MissingField("tags"))?;
        let published = self.published.ok_or(ArxivError::MissingField("published"))?;
        let updated = self.updated.ok_or(ArxivError::MissingField("updated"))?;
        let title = self.title.ok_or(ArxivError::MissingField("title"))?;
        let summary = self.summary.ok_or(ArxivError::MissingField("summary"))?;
        let mut title_detail = self
            .title_detail
            .ok_or(ArxivError::MissingField("title_detail"))?;

        title_detail.value = title_detail.value.as_deref().map(normalize_whitespace);

        Ok(Entry {
            id: self.id,
            title: normalize_whitespace(&title),
            title_detail,
            summary: normalize_whitespace(&summary),
            summary_detail: self.summary_detail,
            authors: self.authors,
            tags: tags.into_iter().map(|tag| tag.term).collect(),
            links: self.links,
            published: parse_timestamp("published", &published)?,
            updated: parse_timestamp("updated", &updated)?,
            comment: self.comment,
            journal_ref: self.journal_ref,
            doi: self.doi,
            primary_category: self.primary_category,
        })
    }
}

impl Entry {
    /// Identifier parsed from the `id` field, if any
    pub fn identifier(&self) -> Option<Identifier> {
        self.id.as_deref().and_then(Identifier::parse)
    }

    /// Link to the PDF as advertised by the feed
    pub fn pdf_url(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| {
                link.title.as_deref() == Some("pdf")
                    || link.content_type.as_deref() == Some("application/pdf")
            })
            .map(|link| link.href.as_str())
    }

    /// Author names in feed order
    pub fn author_names(&self) -> Vec<&str> {
        self.authors.iter().map(|a| a.name.as_str()).collect()
    }
}

/// Parse a feed timestamp.
///
/// The API emits RFC 3339 (`2017-09-22T14:35:17Z`); timestamps without an
/// offset are read as UTC.
fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, ArxivError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ArxivError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn raw_entry() -> RawEntry {
        RawEntry {
            id: Some("http://arxiv.org/abs/1709.05312v1".to_string()),
            title: Some(" a\n title ".to_string()),
            title_detail: Some(TextDetail {
                value: Some(" a\n title_detail ".to_string()),
                content_type: Some("text/plain".to_string()),
            }),
            summary: Some(" a\n summary ".to_string()),
            tags: Some(vec![
                Tag {
                    term: "TERM1".to_string(),
                    ..Default::default()
                },
                Tag {
                    term: "random".to_string(),
                    ..Default::default()
                },
            ]),
            published: Some("2017-09-22 14:35:17.803992".to_string()),
            updated: Some("2017-09-22T14:35:17Z".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_happy_path() {
        let entry = raw_entry().normalize().unwrap();

        assert_eq!(entry.tags, vec!["TERM1", "random"]);
        assert_eq!(entry.title, "a title");
        assert_eq!(entry.summary, "a summary");
        assert_eq!(entry.title_detail.value.as_deref(), Some("a title_detail"));

        assert_eq!(entry.published.year(), 2017);
        assert_eq!(entry.published.nanosecond(), 803_992_000);
        assert_eq!(entry.updated.to_rfc3339(), "2017-09-22T14:35:17+00:00");
    }

    #[test]
    fn test_normalize_without_title_detail_value() {
        let mut raw = raw_entry();
        raw.title_detail = Some(TextDetail::default());

        let entry = raw.normalize().unwrap();
        assert_eq!(entry.title_detail, TextDetail::default());
    }

    #[test]
    fn test_normalize_keeps_optional_fields_absent() {
        let entry = raw_entry().normalize().unwrap();
        assert!(entry.doi.is_none());
        assert!(entry.comment.is_none());
        assert!(entry.journal_ref.is_none());
    }

    #[test]
    fn test_normalize_missing_fields() {
        let cases: [(&str, fn(&mut RawEntry)); 6] = [
            ("tags", |r| r.tags = None),
            ("published", |r| r.published = None),
            ("updated", |r| r.updated = None),
            ("title", |r| r.title = None),
            ("summary", |r| r.summary = None),
            ("title_detail", |r| r.title_detail = None),
        ];

        for (field, strip) in cases {
            let mut raw = raw_entry();
            strip(&mut raw);
            match raw.normalize() {
                Err(ArxivError::MissingField(missing)) => assert_eq!(missing, field),
                other => panic!("expected missing {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_normalize_invalid_date() {
        let mut raw = raw_entry();
        raw.updated = Some("yesterday".to_string());
        assert!(matches!(
            raw.normalize(),
            Err(ArxivError::InvalidDate { field: "updated", .. })
        ));
    }

    #[test]
    fn test_identifier_and_pdf_url() {
        let mut raw = raw_entry();
        raw.links = vec![
            Link {
                href: "http://arxiv.org/abs/1709.05312v1".to_string(),
                rel: Some("alternate".to_string()),
                content_type: Some("text/html".to_string()),
                title: None,
            },
            Link {
                href: "http://arxiv.org/pdf/1709.05312v1".to_string(),
                rel: Some("related".to_string()),
                content_type: Some("application/pdf".to_string()),
                title: Some("pdf".to_string()),
            },
        ];

        let entry = raw.normalize().unwrap();
        let id = entry.identifier().unwrap();
        assert_eq!(id.base, "1709.05312");
        assert_eq!(id.version.as_deref(), Some("1"));
        assert_eq!(entry.pdf_url(), Some("http://arxiv.org/pdf/1709.05312v1"));
    }
}
