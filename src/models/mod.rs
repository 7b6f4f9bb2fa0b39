//! Core data models: identifiers, catalog records and query filters.

mod category;
mod entry;
mod identifier;
mod query;

pub use category::{Category, UnknownCategory};
pub use entry::{Author, Entry, Link, RawEntry, Tag, TextDetail};
pub use identifier::{uses_new_style_id, Identifier};
pub use query::{build_fragment, build_request, CategoryRef, QueryFilters, DEFAULT_MAX_RESULTS};
