//! # Version Derivation
//!
//! Computes the version identifiers that key every new recipe entry.
//!
//! bx and bimg have no release tags upstream, so their version is the number
//! of commits reachable from the checked-out revision. bgfx does carry its
//! own `MAJOR.MINOR.PATCH` version, but it is only available from the
//! project's build tooling: running bx's bundled `genie` with the `version`
//! action from bgfx's `scripts/` directory prints it.

use std::path::{Path, PathBuf};

use log::info;
use regex::Regex;

use crate::error::{Error, Result};
use crate::process;
use crate::repository::{GitOperations, SourceTrees};

/// Version identifiers for one run, one per library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTriple {
    pub bx: String,
    pub bimg: String,
    pub bgfx: String,
}

/// Return the first line of `output` that is exactly three dot-separated
/// groups of digits.
///
/// Lines are compared after trimming surrounding whitespace; anything else
/// on the line (a `v` prefix, trailing words) disqualifies it.
pub fn parse_version_output(output: &str) -> Result<String> {
    let version_line = Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$")?;
    output
        .lines()
        .map(str::trim)
        .find(|line| version_line.is_match(line))
        .map(str::to_string)
        .ok_or_else(|| Error::VersionFormatNotFound {
            output: output.to_string(),
        })
}

/// Location of the `genie` executable shipped in bx for the host platform.
pub fn genie_path(bx_dir: &Path) -> PathBuf {
    let (platform, executable) = if cfg!(target_os = "windows") {
        ("windows", "genie.exe")
    } else if cfg!(target_os = "macos") {
        ("darwin", "genie")
    } else {
        ("linux", "genie")
    };
    bx_dir
        .join("tools")
        .join("bin")
        .join(platform)
        .join(executable)
}

/// Ask `genie` for the bgfx version.
pub fn bgfx_version(genie: &Path, bgfx_dir: &Path) -> Result<String> {
    let scripts = bgfx_dir.join("scripts");
    let output = process::run(genie, &["version"], Some(&scripts))?;
    parse_version_output(&output)
}

/// Derive the version triple for synchronized trees.
///
/// `genie` overrides the build tool location; by default the binary bundled
/// in the bx checkout is used.
pub fn derive(
    git: &dyn GitOperations,
    trees: &SourceTrees,
    genie: Option<&Path>,
) -> Result<VersionTriple> {
    let bx = git.revision_count(&trees.bx.path)?;
    let bimg = git.revision_count(&trees.bimg.path)?;

    let genie = genie
        .map(Path::to_path_buf)
        .unwrap_or_else(|| genie_path(&trees.bx.path));
    let bgfx = bgfx_version(&genie, &trees.bgfx.path)?;

    info!("Versions: bx={}, bimg={}, bgfx={}", bx, bimg, bgfx);
    Ok(VersionTriple { bx, bimg, bgfx })
}
