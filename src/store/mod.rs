//! On-disk record store.
//!
//! Each record is written as JSON to `<target_dir>/<id>/<file_name>`, one
//! directory per paper, so harvested metadata can sit next to its PDF.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ArxivError, ResolveError};
use crate::models::{Entry, Identifier, RawEntry};
use crate::utils::sanitize_filename;

/// File name used when none is given
pub const DEFAULT_RECORD_FILE: &str = "data.json";

/// A record that can be stored under its paper id
pub trait StoredRecord: Serialize {
    fn identifier(&self) -> Option<Identifier>;
}

impl StoredRecord for RawEntry {
    fn identifier(&self) -> Option<Identifier> {
        RawEntry::identifier(self)
    }
}

impl StoredRecord for Entry {
    fn identifier(&self) -> Option<Identifier> {
        Entry::identifier(self)
    }
}

/// What [`save_entry`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written(PathBuf),
    /// The file existed and overwriting was off
    Skipped(PathBuf),
}

impl SaveOutcome {
    pub fn path(&self) -> &Path {
        match self {
            SaveOutcome::Written(path) | SaveOutcome::Skipped(path) => path,
        }
    }
}

/// Directory a record with `id` is stored in
pub fn entry_dir(target_dir: &Path, id: &Identifier) -> PathBuf {
    target_dir.join(sanitize_filename(&id.canonical()))
}

/// Write `entry` as JSON to `<target_dir>/<id>/<file_name>`.
///
/// `target_dir` must exist; the per-entry directory is created as needed.
/// With `overwrite == false` an existing file is left untouched.
pub fn save_entry<R: StoredRecord>(
    entry: &R,
    target_dir: &Path,
    file_name: &str,
    overwrite: bool,
) -> Result<SaveOutcome, ArxivError> {
    let id = entry
        .identifier()
        .ok_or_else(|| ResolveError::InvalidIdentifier("record without id".to_string()))?;

    if !target_dir.is_dir() {
        return Err(ArxivError::DirectoryNotFound(target_dir.to_path_buf()));
    }

    let dir = entry_dir(target_dir, &id);
    fs::create_dir_all(&dir)?;

    let path = dir.join(file_name);
    if !overwrite && path.is_file() {
        debug!(path = %path.display(), "record exists, skipping");
        return Ok(SaveOutcome::Skipped(path));
    }

    let json = serde_json::to_string(entry)?;
    fs::write(&path, json)?;
    debug!(path = %path.display(), "record saved");
    Ok(SaveOutcome::Written(path))
}

/// Save every record with [`save_entry`], stopping at the first error
pub fn save_entries<R: StoredRecord>(
    entries: &[R],
    target_dir: &Path,
    file_name: &str,
    overwrite: bool,
) -> Result<Vec<SaveOutcome>, ArxivError> {
    entries
        .iter()
        .map(|entry| save_entry(entry, target_dir, file_name, overwrite))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::make_entry;
    use tempfile::tempdir;

    #[test]
    fn test_save_entry_layout() {
        let dir = tempdir().unwrap();
        let entry = make_entry("1709.05312v1", "Title");

        let outcome = save_entry(&entry, dir.path(), DEFAULT_RECORD_FILE, false).unwrap();
        let expected = dir.path().join("1709.05312v1").join("data.json");
        assert_eq!(outcome, SaveOutcome::Written(expected.clone()));

        let stored: RawEntry =
            serde_json::from_str(&fs::read_to_string(&expected).unwrap()).unwrap();
        assert_eq!(stored, entry);
    }

    #[test]
    fn test_save_entry_respects_overwrite() {
        let dir = tempdir().unwrap();
        let first = make_entry("1709.05312", "First");
        let second = make_entry("1709.05312", "Second");

        save_entry(&first, dir.path(), "meta.json", false).unwrap();
        let skipped = save_entry(&second, dir.path(), "meta.json", false).unwrap();
        assert!(matches!(skipped, SaveOutcome::Skipped(_)));

        let stored: RawEntry =
            serde_json::from_str(&fs::read_to_string(skipped.path()).unwrap()).unwrap();
        assert_eq!(stored.title.as_deref(), Some("First"));

        let written = save_entry(&second, dir.path(), "meta.json", true).unwrap();
        assert!(matches!(written, SaveOutcome::Written(_)));
        let stored: RawEntry =
            serde_json::from_str(&fs::read_to_string(written.path()).unwrap()).unwrap();
        assert_eq!(stored.title.as_deref(), Some("Second"));
    }

    #[test]
    fn test_old_style_id_stays_in_one_directory() {
        let dir = tempdir().unwrap();
        let entry = make_entry("hep-th/9901001v1", "Old");

        let outcome = save_entry(&entry, dir.path(), DEFAULT_RECORD_FILE, false).unwrap();
        assert_eq!(
            outcome.path(),
            dir.path().join("hep_th_9901001v1").join("data.json")
        );
    }

    #[test]
    fn test_save_entry_errors() {
        let dir = tempdir().unwrap();

        let err = save_entry(&RawEntry::default(), dir.path(), DEFAULT_RECORD_FILE, false)
            .unwrap_err();
        assert!(matches!(
            err,
            ArxivError::Resolve(ResolveError::InvalidIdentifier(_))
        ));

        let missing = dir.path().join("missing");
        let err = save_entry(&make_entry("1", "t"), &missing, DEFAULT_RECORD_FILE, false)
            .unwrap_err();
        assert!(matches!(err, ArxivError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_save_entries() {
        let dir = tempdir().unwrap();
        let entries = vec![make_entry("1", "a"), make_entry("2", "b")];

        let outcomes = save_entries(&entries, dir.path(), DEFAULT_RECORD_FILE, false).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(dir.path().join("1").join("data.json").is_file());
        assert!(dir.path().join("2").join("data.json").is_file());
    }
}
