//! Atom feed parsing for query API responses.
//!
//! The arXiv API answers with an Atom feed extended by the `arxiv:` and
//! `opensearch:` namespaces. Elements are matched on their local name so the
//! namespace prefixes chosen by the server do not matter.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::FeedError;
use crate::models::{Author, Link, RawEntry, Tag, TextDetail};

/// A parsed query response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    pub title: Option<String>,

    /// `opensearch:totalResults`
    pub total_results: Option<usize>,

    /// `opensearch:startIndex`
    pub start_index: Option<usize>,

    /// `opensearch:itemsPerPage`
    pub items_per_page: Option<usize>,

    pub entries: Vec<RawEntry>,
}

/// Parse an Atom document into a [`Feed`]
pub fn parse_feed(xml: &str) -> Result<Feed, FeedError> {
    let mut reader = Reader::from_str(xml);
    let mut builder = FeedBuilder::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => builder.open(&e)?,
            Event::Empty(e) => {
                builder.open(&e)?;
                builder.close(e.local_name().as_ref());
            }
            Event::End(e) => builder.close(e.local_name().as_ref()),
            Event::Text(e) => {
                if builder.capturing() {
                    builder.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if builder.capturing() {
                    builder.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    builder.finish()
}

/// Text-valued element currently being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    FeedTitle,
    TotalResults,
    StartIndex,
    ItemsPerPage,
    Id,
    Title,
    Summary,
    Published,
    Updated,
    Comment,
    JournalRef,
    Doi,
    AuthorName,
    Affiliation,
}

#[derive(Debug, Default)]
struct FeedBuilder {
    feed: Feed,
    seen_root: bool,
    entry: Option<RawEntry>,
    author: Option<Author>,
    field: Option<Field>,
    /// Elements opened inside the field being captured (e.g. xhtml markup)
    nested: usize,
    text: String,
}

impl FeedBuilder {
    fn capturing(&self) -> bool {
        self.field.is_some()
    }

    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), FeedError> {
        let local = e.local_name();
        let name = local.as_ref();

        if !self.seen_root {
            if name != b"feed" {
                return Err(FeedError::NotAFeed(
                    String::from_utf8_lossy(name).into_owned(),
                ));
            }
            self.seen_root = true;
            return Ok(());
        }

        if self.field.is_some() {
            self.nested += 1;
            return Ok(());
        }

        let Some(entry) = self.entry.as_mut() else {
            match name {
                b"entry" => {
                    self.entry = Some(RawEntry {
                        tags: Some(Vec::new()),
                        ..Default::default()
                    })
                }
                b"title" => self.capture(Field::FeedTitle),
                b"totalResults" => self.capture(Field::TotalResults),
                b"startIndex" => self.capture(Field::StartIndex),
                b"itemsPerPage" => self.capture(Field::ItemsPerPage),
                _ => {}
            }
            return Ok(());
        };

        if self.author.is_some() {
            match name {
                b"name" => self.capture(Field::AuthorName),
                b"affiliation" => self.capture(Field::Affiliation),
                _ => {}
            }
            return Ok(());
        }

        match name {
            b"author" => self.author = Some(Author::default()),
            b"id" => self.capture(Field::Id),
            b"title" => {
                entry.title_detail = Some(text_detail(e)?);
                self.capture(Field::Title);
            }
            b"summary" => {
                entry.summary_detail = Some(text_detail(e)?);
                self.capture(Field::Summary);
            }
            b"published" => self.capture(Field::Published),
            b"updated" => self.capture(Field::Updated),
            b"comment" => self.capture(Field::Comment),
            b"journal_ref" => self.capture(Field::JournalRef),
            b"doi" => self.capture(Field::Doi),
            b"link" => entry.links.push(link(e)?),
            b"category" => {
                let tag = tag(e)?;
                entry.tags.get_or_insert_with(Vec::new).push(tag);
            }
            b"primary_category" => entry.primary_category = attribute(e, b"term")?,
            _ => {}
        }

        Ok(())
    }

    fn capture(&mut self, field: Field) {
        self.field = Some(field);
        self.nested = 0;
        self.text.clear();
    }

    fn close(&mut self, name: &[u8]) {
        if let Some(field) = self.field {
            if self.nested > 0 {
                self.nested -= 1;
            } else {
                self.field = None;
                let text = std::mem::take(&mut self.text);
                self.store(field, text);
            }
            return;
        }

        match name {
            b"author" => {
                if let (Some(author), Some(entry)) = (self.author.take(), self.entry.as_mut()) {
                    entry.authors.push(author);
                }
            }
            b"entry" if self.author.is_none() => {
                if let Some(entry) = self.entry.take() {
                    self.feed.entries.push(entry);
                }
            }
            _ => {}
        }
    }

    fn store(&mut self, field: Field, text: String) {
        match field {
            Field::FeedTitle => self.feed.title = Some(text),
            Field::TotalResults => self.feed.total_results = text.trim().parse().ok(),
            Field::StartIndex => self.feed.start_index = text.trim().parse().ok(),
            Field::ItemsPerPage => self.feed.items_per_page = text.trim().parse().ok(),
            Field::AuthorName => {
                if let Some(author) = self.author.as_mut() {
                    author.name = text.trim().to_string();
                }
            }
            Field::Affiliation => {
                if let Some(author) = self.author.as_mut() {
                    author.affiliation = Some(text.trim().to_string());
                }
            }
            _ => {
                let Some(entry) = self.entry.as_mut() else {
                    return;
                };
                match field {
                    Field::Id => entry.id = Some(text.trim().to_string()),
                    Field::Title => {
                        if let Some(detail) = entry.title_detail.as_mut() {
                            detail.value = Some(text.clone());
                        }
                        entry.title = Some(text);
                    }
                    Field::Summary => {
                        if let Some(detail) = entry.summary_detail.as_mut() {
                            detail.value = Some(text.clone());
                        }
                        entry.summary = Some(text);
                    }
                    Field::Published => entry.published = Some(text.trim().to_string()),
                    Field::Updated => entry.updated = Some(text.trim().to_string()),
                    Field::Comment => entry.comment = Some(text),
                    Field::JournalRef => entry.journal_ref = Some(text),
                    Field::Doi => entry.doi = Some(text.trim().to_string()),
                    _ => {}
                }
            }
        }
    }

    fn finish(self) -> Result<Feed, FeedError> {
        if !self.seen_root {
            return Err(FeedError::MissingRoot);
        }
        if self.entry.is_some() || self.field.is_some() {
            return Err(FeedError::UnexpectedEof);
        }
        Ok(self.feed)
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, FeedError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn text_detail(e: &BytesStart<'_>) -> Result<TextDetail, FeedError> {
    Ok(TextDetail {
        value: None,
        content_type: attribute(e, b"type")?.or_else(|| Some("text".to_string())),
    })
}

fn link(e: &BytesStart<'_>) -> Result<Link, FeedError> {
    Ok(Link {
        href: attribute(e, b"href")?.unwrap_or_default(),
        rel: attribute(e, b"rel")?,
        content_type: attribute(e, b"type")?,
        title: attribute(e, b"title")?,
    })
}

fn tag(e: &BytesStart<'_>) -> Result<Tag, FeedError> {
    Ok(Tag {
        term: attribute(e, b"term")?.unwrap_or_default(),
        scheme: attribute(e, b"scheme")?,
        label: attribute(e, b"label")?,
    })
}
