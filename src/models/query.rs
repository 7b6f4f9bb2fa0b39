//! Search query construction for the arXiv query API.
//!
//! See <https://arxiv.org/help/api/user-manual#query_details> for the field
//! prefixes (`cat`, `ti`, `au`, `abs`, `jr`).

use serde::{Deserialize, Serialize};

use super::Category;

/// Default number of results per request
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// A category filter given either as a raw code or a known table member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Known(Category),
    Code(String),
}

impl CategoryRef {
    /// Wire-format code for this category
    pub fn code(&self) -> &str {
        match self {
            CategoryRef::Known(category) => category.code(),
            CategoryRef::Code(code) => code,
        }
    }
}

impl From<Category> for CategoryRef {
    fn from(category: Category) -> Self {
        CategoryRef::Known(category)
    }
}

impl From<&str> for CategoryRef {
    fn from(code: &str) -> Self {
        CategoryRef::Code(code.to_string())
    }
}

impl From<String> for CategoryRef {
    fn from(code: String) -> Self {
        CategoryRef::Code(code)
    }
}

/// Filters for a catalog query
///
/// Structured fields are combined with `AND`. A non-empty `raw_query` is used
/// verbatim instead of the structured fields; `max_results`, `start` and
/// `ids` still apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilters {
    /// Maximum number of results to return
    pub max_results: usize,

    /// Offset of the first result (paging)
    #[serde(default)]
    pub start: Option<usize>,

    /// Paper ids to look up (OR-ed together by the API)
    #[serde(default)]
    pub ids: Vec<String>,

    /// Categories, OR-ed together
    #[serde(default)]
    pub categories: Vec<CategoryRef>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub authors: String,

    #[serde(default)]
    pub abstract_text: String,

    /// Journal reference, e.g. `Phys Rev Lett`
    #[serde(default)]
    pub journal_ref: String,

    /// Pre-escaped search query ("manual mode")
    #[serde(default)]
    pub raw_query: String,
}

impl Default for QueryFilters {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            start: None,
            ids: Vec::new(),
            categories: Vec::new(),
            title: String::new(),
            authors: String::new(),
            abstract_text: String::new(),
            journal_ref: String::new(),
            raw_query: String::new(),
        }
    }
}

impl QueryFilters {
    /// Create an empty set of filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters that look up papers by id only
    pub fn by_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Set the offset of the first result
    pub fn start(mut self, start: usize) -> Self {
        self.start = Some(start);
        self
    }

    /// Add a paper id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.ids.push(id.into());
        self
    }

    /// Add a category
    pub fn category(mut self, category: impl Into<CategoryRef>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Set title filter
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set author filter
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = authors.into();
        self
    }

    /// Set abstract filter
    pub fn abstract_text(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = text.into();
        self
    }

    /// Set journal reference filter
    pub fn journal_ref(mut self, journal_ref: impl Into<String>) -> Self {
        self.journal_ref = journal_ref.into();
        self
    }

    /// Use a pre-escaped query string instead of the structured filters
    pub fn raw_query(mut self, query: impl Into<String>) -> Self {
        self.raw_query = query.into();
        self
    }

    /// The escaped `search_query` fragment these filters produce
    pub fn fragment(&self) -> String {
        if !self.raw_query.is_empty() {
            return self.raw_query.clone();
        }
        build_fragment(
            &self.categories,
            &self.title,
            &self.authors,
            &self.abstract_text,
            &self.journal_ref,
        )
    }

    /// Full query string for the API request (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        let mut query = format!("max_results={}", self.max_results);
        if let Some(start) = self.start {
            query.push_str(&format!("&start={}", start));
        }
        append_search_params(&mut query, &self.fragment(), &self.ids);
        query
    }
}

/// Build the escaped `search_query` fragment from structured fields.
///
/// Clauses appear in a fixed order (categories, title, authors, abstract,
/// journal reference) and are joined with `AND`. Empty fields contribute
/// nothing; if every field is empty the result is empty.
pub fn build_fragment(
    categories: &[CategoryRef],
    title: &str,
    authors: &str,
    abstract_text: &str,
    journal_ref: &str,
) -> String {
    let mut clauses = Vec::new();

    if !categories.is_empty() {
        let disjunction = categories
            .iter()
            .map(|c| format!("cat:{}", c.code()))
            .collect::<Vec<_>>()
            .join(" OR ");
        clauses.push(format!("({})", disjunction));
    }

    for (prefix, value) in [
        ("ti", title),
        ("au", authors),
        ("abs", abstract_text),
        ("jr", journal_ref),
    ] {
        if !value.is_empty() {
            clauses.push(format!("{}:\"{}\"", prefix, value));
        }
    }

    escape_query(&clauses.join(" AND "))
}

/// Build the request query string from its parts.
///
/// `max_results` is always present; `search_query` and `id_list` only when
/// non-empty.
pub fn build_request(max_results: usize, ids: &[String], fragment: &str) -> String {
    let mut query = format!("max_results={}", max_results);
    append_search_params(&mut query, fragment, ids);
    query
}

fn append_search_params(query: &mut String, fragment: &str, ids: &[String]) {
    if !fragment.is_empty() {
        query.push_str("&search_query=");
        query.push_str(fragment);
    }
    if !ids.is_empty() {
        query.push_str("&id_list=");
        query.push_str(&ids.join(","));
    }
}

/// Percent-escape a query component, keeping `:` and `+` and encoding spaces
/// as `+`.
fn escape_query(query: &str) -> String {
    urlencoding::encode(query)
        .replace("%20", "+")
        .replace("%3A", ":")
        .replace("%2B", "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment_of(categories: &[CategoryRef]) -> String {
        build_fragment(categories, "", "", "", "")
    }

    #[test]
    fn test_empty_fragment() {
        assert_eq!(build_fragment(&[], "", "", "", ""), "");
        assert_eq!(QueryFilters::new().fragment(), "");
    }

    #[test]
    fn test_categories() {
        assert_eq!(fragment_of(&["randomString".into()]), "%28cat:randomString%29");
        assert_eq!(
            fragment_of(&["randcat".into(), "rand2".into()]),
            "%28cat:randcat+OR+cat:rand2%29"
        );
        assert_eq!(fragment_of(&["cs.AI".into()]), "%28cat:cs.AI%29");
    }

    #[test]
    fn test_categories_resolve_known_members() {
        assert_eq!(
            fragment_of(&[
                "rand1".into(),
                Category::CsAI.into(),
                "otherRandomString".into()
            ]),
            "%28cat:rand1+OR+cat:cs.AI+OR+cat:otherRandomString%29"
        );
    }

    #[test]
    fn test_single_fields() {
        assert_eq!(
            build_fragment(&[], "some random title", "", "", ""),
            "ti:%22some+random+title%22"
        );
        assert_eq!(
            build_fragment(&[], "", "some author name", "", ""),
            "au:%22some+author+name%22"
        );
        assert_eq!(
            build_fragment(&[], "", "", "some abstract", ""),
            "abs:%22some+abstract%22"
        );
        assert_eq!(
            build_fragment(&[], "", "", "", "Phys Rev Lett"),
            "jr:%22Phys+Rev+Lett%22"
        );
    }

    #[test]
    fn test_all_fields_in_fixed_order() {
        let fragment = build_fragment(
            &["cs.AI".into(), "cs.INVENTED".into()],
            "some title",
            "some author",
            "some abstract",
            "journal ref",
        );
        assert_eq!(
            fragment,
            "%28cat:cs.AI+OR+cat:cs.INVENTED%29+AND+\
             ti:%22some+title%22+AND+\
             au:%22some+author%22+AND+\
             abs:%22some+abstract%22+AND+\
             jr:%22journal+ref%22"
        );
    }

    #[test]
    fn test_escaping_keeps_plus_and_escapes_others() {
        assert_eq!(
            build_fragment(&[], "a+b/c&d", "", "", ""),
            "ti:%22a+b%2Fc%26d%22"
        );
        assert_eq!(build_fragment(&[], "Schrödinger", "", "", ""), "ti:%22Schr%C3%B6dinger%22");
    }

    #[test]
    fn test_build_request_ids_only() {
        let ids = vec!["1".to_string(), "2".to_string()];
        assert_eq!(build_request(100, &ids, ""), "max_results=100&id_list=1,2");
    }

    #[test]
    fn test_build_request_max_results_always_present() {
        assert_eq!(build_request(100, &[], ""), "max_results=100");
        assert_eq!(QueryFilters::new().to_query_string(), "max_results=100");
    }

    #[test]
    fn test_raw_query_overrides_structured_fields() {
        let filters = QueryFilters::new()
            .id("1")
            .authors("asdf")
            .raw_query("somequerystring");
        assert_eq!(
            filters.to_query_string(),
            "max_results=100&search_query=somequerystring&id_list=1"
        );
    }

    #[test]
    fn test_start_follows_max_results() {
        let filters = QueryFilters::new()
            .max_results(20)
            .start(40)
            .category(Category::CsLG);
        assert_eq!(
            filters.to_query_string(),
            "max_results=20&start=40&search_query=%28cat:cs.LG%29"
        );
    }

    #[test]
    fn test_filters_are_fresh_per_call() {
        let first = QueryFilters::new().id("1");
        let second = QueryFilters::new();
        assert_eq!(first.ids.len(), 1);
        assert!(second.ids.is_empty());
    }
}
