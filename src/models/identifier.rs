//! arXiv identifier parsing.
//!
//! Accepts bare ids (`1709.07432`), versioned ids (`1709.07432v2`), old-style
//! archive ids (`cmp-lg/9808001v1`) and abstract page URLs
//! (`https://arxiv.org/abs/1709.07432v2`).

use serde::{Deserialize, Serialize};
use std::fmt;

const ABS_MARKER: &str = "abs/";

/// A paper identifier split into its base id and optional version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    /// Id without the version suffix, e.g. `1709.07432` or `cmp-lg/9808001`
    pub base: String,

    /// Version number without the leading `v`
    pub version: Option<String>,
}

impl Identifier {
    /// Create an identifier from its parts
    pub fn new(base: impl Into<String>, version: Option<String>) -> Self {
        Self {
            base: base.into(),
            version,
        }
    }

    /// Parse an id, versioned id or abstract URL.
    ///
    /// Only the text after the last `abs/` is considered. The version is split
    /// off at the literal `v` character: everything before the first `v` is the
    /// base and the text between the first and second `v` is the version.
    /// Inputs whose base would contain a `v` are therefore split incorrectly;
    /// no supported arXiv id has one.
    ///
    /// Returns `None` when no base id remains.
    pub fn parse(input: &str) -> Option<Self> {
        let segment = match input.rfind(ABS_MARKER) {
            Some(pos) => &input[pos + ABS_MARKER.len()..],
            None => input,
        };

        let mut parts = segment.split('v');
        let base = parts.next().unwrap_or_default();
        if base.is_empty() {
            return None;
        }
        let version = parts.next().map(str::to_string);

        Some(Self::new(base, version))
    }

    /// Canonical id string: base plus `v<version>` when a version is known
    pub fn canonical(&self) -> String {
        match &self.version {
            Some(version) => format!("{}v{}", self.base, version),
            None => self.base.clone(),
        }
    }

    /// Whether this is a new-style (dotted, post-2007) id
    pub fn is_new_style(&self) -> bool {
        uses_new_style_id(&self.base)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        if let Some(version) = &self.version {
            write!(f, "v{}", version)?;
        }
        Ok(())
    }
}

/// Whether an id or URL uses the new identifier scheme.
///
/// New-style ids are dotted (`YYMM.NNNNN`); old-style ids put a bare number
/// after the archive prefix (`cmp-lg/9808001`), so only the final path
/// segment is inspected.
pub fn uses_new_style_id(url_or_id: &str) -> bool {
    url_or_id
        .rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}
