//! Default values for updater configuration.
//!
//! This module provides centralized default values used by the CLI and the
//! library, ensuring consistency and avoiding duplication.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Host and organisation the bx, bimg and bgfx repositories live under.
pub const REMOTE_BASE: &str = "https://github.com/bkaradzic";

/// Directory the updater executable lives in, with symlinks resolved.
///
/// Falls back to an empty path, i.e. the working directory, when the
/// executable location cannot be determined.
pub fn install_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .map(|exe| fs::canonicalize(&exe).unwrap_or(exe))
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
}

/// Returns the default scratch directory for clones and archives:
/// `tmp` next to the executable.
pub fn default_temp_dir() -> PathBuf {
    install_dir().join("tmp")
}

/// Returns the default location of the conan-center-index checkout.
pub fn default_conan_center_index() -> PathBuf {
    default_temp_dir().join("conan-center-index")
}
