//! Legacy flat-file store reader
//!
//! Each entity kind lives in one JSON file in the storage directory, either
//! as a map keyed by identity or as a plain list. Both keep the order the
//! entries have in the file.
//!
//! Callers check that the file exists before reading; a missing file here is
//! reported like any other unreadable file.

use crate::error::LegacyDataError;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read a `{ "<key>": <entity> }` file
pub fn load_map<T: DeserializeOwned>(path: &Path) -> Result<IndexMap<String, T>, LegacyDataError> {
    read_document(path)
}

/// Read a `[ <entity>, ... ]` file
pub fn load_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LegacyDataError> {
    read_document(path)
}

/// Empty files and a literal `null` are empty collections
fn read_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T, LegacyDataError> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }

    let document: Option<T> = serde_json::from_str(&content)?;
    Ok(document.unwrap_or_default())
}
