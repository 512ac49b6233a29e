//! YAML recipe metadata updates
//!
//! conan-center-index keeps two YAML files per recipe that list every
//! published version:
//!
//! - `config.yml`: `versions` maps a version to the recipe folder
//!   (`{folder: all}`).
//! - `conandata.yml`: `sources` maps a version to its archive
//!   (`{url, sha256}`).
//!
//! New versions are prepended so the newest entry comes first. An existing
//! entry for the same version is replaced rather than duplicated, and every
//! other entry and top-level section is written back untouched.

use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};

/// Section of `config.yml` that lists versions.
pub const VERSIONS_SECTION: &str = "versions";
/// Section of `conandata.yml` that lists source archives.
pub const SOURCES_SECTION: &str = "sources";

/// Value of a `config.yml` `versions` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderEntry {
    pub folder: String,
}

impl FolderEntry {
    /// All three recipes live in the `all/` folder.
    pub fn all() -> Self {
        Self {
            folder: "all".to_string(),
        }
    }
}

/// Value of a `conandata.yml` `sources` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    pub url: String,
    pub sha256: String,
}

/// Text of a scalar mapping key, so `5` and `"5"` compare equal.
fn key_text(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whether an existing mapping key names the version `key`.
///
/// Unquoted keys parse as numbers: `5` matches `"5"`, and a float such as
/// `1.10`, read back as `1.1`, matches `"1.10"`.
fn is_same_key(existing: &YamlValue, key: &str) -> bool {
    if key_text(existing).as_deref() == Some(key) {
        return true;
    }
    match existing {
        YamlValue::Number(n) if n.is_f64() => key.parse::<f64>().ok() == n.as_f64(),
        _ => false,
    }
}

fn merge_entry(
    document: &mut YamlValue,
    section: &str,
    key: &str,
    value: YamlValue,
) -> std::result::Result<(), String> {
    if document.is_null() {
        *document = YamlValue::Mapping(Mapping::new());
    }
    let root = document
        .as_mapping_mut()
        .ok_or_else(|| "document is not a mapping".to_string())?;

    let section_key = YamlValue::String(section.to_string());
    let existing = match root.get(&section_key) {
        None | Some(YamlValue::Null) => Mapping::new(),
        Some(YamlValue::Mapping(entries)) => entries.clone(),
        Some(_) => return Err(format!("'{}' is not a mapping", section)),
    };

    let mut merged = Mapping::new();
    merged.insert(YamlValue::String(key.to_string()), value);
    for (existing_key, existing_value) in existing {
        if is_same_key(&existing_key, key) {
            continue;
        }
        merged.insert(existing_key, existing_value);
    }

    // Mapping::insert keeps the position of an existing key.
    root.insert(section_key, YamlValue::Mapping(merged));
    Ok(())
}

/// Merge `key: value` at the front of `section` in a YAML document and
/// return the re-serialized document.
pub fn prepend_entry<V: Serialize>(
    document: &str,
    section: &str,
    key: &str,
    value: &V,
) -> Result<String> {
    prepend_entry_in(document, section, key, value, "<input>")
}

fn prepend_entry_in<V: Serialize>(
    document: &str,
    section: &str,
    key: &str,
    value: &V,
    origin: &str,
) -> Result<String> {
    let mut parsed: YamlValue = if document.trim().is_empty() {
        YamlValue::Null
    } else {
        serde_yaml::from_str(document)?
    };
    let value = serde_yaml::to_value(value)?;
    merge_entry(&mut parsed, section, key, value).map_err(|message| Error::Metadata {
        path: origin.to_string(),
        message,
    })?;
    Ok(serde_yaml::to_string(&parsed)?)
}

/// Apply [`prepend_entry`] to a file in place.
pub fn update_file<V: Serialize>(path: &Path, section: &str, key: &str, value: &V) -> Result<()> {
    let origin = path.display().to_string();
    let document = fs::read_to_string(path).map_err(|e| Error::Metadata {
        path: origin.clone(),
        message: e.to_string(),
    })?;
    let updated = prepend_entry_in(&document, section, key, value, &origin)?;
    fs::write(path, updated)?;
    info!("Added {} '{}' to {}", section, key, origin);
    Ok(())
}
