//! bgfx `conanfile.py` compatibility tables
//!
//! The bgfx recipe pins the bx and bimg versions each bgfx release builds
//! against through two properties of the form
//!
//! ```text
//! @property
//! def _bx_version(self):
//!     return {
//!         "1.128.8808": "2158",
//!     }
//! ```
//!
//! The recipe is Python source rather than data, so it is edited as text:
//! the property is located by its signature, and within its mapping literal
//! the entry for the bgfx version is either rewritten in place or inserted
//! right after the opening brace. Everything outside that one entry is left
//! byte-for-byte as it was. Commented-out entries are not recognised.

use std::fs;
use std::path::Path;

use log::{info, warn};
use regex::Regex;

use crate::error::Result;
use crate::version::VersionTriple;

/// Property mapping bgfx versions to bx versions.
pub const BX_ACCESSOR: &str = "_bx_version";
/// Property mapping bgfx versions to bimg versions.
pub const BIMG_ACCESSOR: &str = "_bimg_version";

/// Leading whitespace for a new entry: that of the first existing entry, or
/// the `def` line's indentation plus two levels when the mapping is empty.
fn entry_indent(text: &str, def_start: usize, body: &str) -> String {
    let sibling = body
        .split('\n')
        .skip(1)
        .find(|line| !line.trim().is_empty());
    if let Some(line) = sibling {
        let content = line.trim_start();
        return line[..line.len() - content.len()].to_string();
    }

    let line_start = text[..def_start].rfind('\n').map_or(0, |i| i + 1);
    let def_indent = &text[line_start..def_start];
    if def_indent.trim().is_empty() {
        format!("{}        ", def_indent)
    } else {
        " ".repeat(8)
    }
}

/// Install `"key": "value"` into the mapping returned by `accessor`.
///
/// An existing entry for `key` has its value replaced (a missing closing
/// quote on the old value is tolerated). Otherwise a new entry is inserted as
/// the first line of the mapping, using the line ending already there, or
/// as the first item when the mapping is written on a single line. If the
/// accessor cannot be found the text is returned unchanged.
pub fn patch_accessor(text: &str, accessor: &str, key: &str, value: &str) -> Result<String> {
    let signature = Regex::new(&format!(
        r"def {}\(self\):\s*return\s*\{{",
        regex::escape(accessor)
    ))?;
    let Some(found) = signature.find(text) else {
        warn!("Accessor {} not found in recipe, leaving it unchanged", accessor);
        return Ok(text.to_string());
    };

    let body_start = found.end();
    let body_end = text[body_start..]
        .find('}')
        .map_or(text.len(), |i| body_start + i);
    let body = &text[body_start..body_end];

    let entry = Regex::new(&format!(r#""{}":\s*"[^",\n]*"?"#, regex::escape(key)))?;
    let replacement = format!(r#""{}": "{}""#, key, value);

    if let Some(existing) = entry.find(body) {
        let start = body_start + existing.start();
        let end = body_start + existing.end();
        return Ok(format!("{}{}{}", &text[..start], replacement, &text[end..]));
    }

    let (before, after) = text.split_at(body_start);

    // `{"a": "b"}` or `{}` written on one line stays on one line.
    let first_line = body.split('\n').next().unwrap_or_default();
    if !body.contains('\n') || !first_line.trim().is_empty() {
        let separator = if body.trim().is_empty() { "" } else { ", " };
        return Ok(format!("{}{}{}{}", before, replacement, separator, after));
    }

    let newline = if first_line.ends_with('\r') { "\r\n" } else { "\n" };
    let indent = entry_indent(text, found.start(), body);
    Ok(format!("{}{}{}{},{}", before, newline, indent, replacement, after))
}

/// Record the bx and bimg versions for the bgfx version in a recipe.
pub fn patch_conanfile(text: &str, versions: &VersionTriple) -> Result<String> {
    let text = patch_accessor(text, BX_ACCESSOR, &versions.bgfx, &versions.bx)?;
    patch_accessor(&text, BIMG_ACCESSOR, &versions.bgfx, &versions.bimg)
}

/// Apply [`patch_conanfile`] to a recipe file in place.
pub fn update_conanfile(path: &Path, versions: &VersionTriple) -> Result<()> {
    let text = fs::read_to_string(path)?;
    let patched = patch_conanfile(&text, versions)?;
    fs::write(path, patched)?;
    info!(
        "Mapped bgfx {} to bx {} and bimg {} in {}",
        versions.bgfx,
        versions.bx,
        versions.bimg,
        path.display()
    );
    Ok(())
}
