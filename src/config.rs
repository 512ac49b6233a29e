//! # Updater Configuration
//!
//! All settings for one run travel in an [`UpdaterConfig`] value that is
//! passed explicitly to every stage; nothing is read from global state.
//!
//! The configuration also knows where each file the updater patches lives
//! inside a conan-center-index checkout:
//!
//! ```text
//! recipes/<lib>/config.yml          versions -> {folder}
//! recipes/<lib>/all/conandata.yml   sources  -> {url, sha256}
//! recipes/bgfx/all/conanfile.py     _bx_version / _bimg_version tables
//! ```

use std::path::{Path, PathBuf};

use crate::defaults;

/// Settings for a single update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    /// Root of the conan-center-index checkout to patch.
    pub conan_center_index: PathBuf,
    /// Scratch directory holding the three clones and downloaded archives.
    pub temp_dir: PathBuf,
    /// bgfx revision to pin to; `None` follows the default branch.
    pub bgfx_sha: Option<String>,
    /// Base URL the repositories are cloned from and archives point to.
    pub remote_base: String,
    /// Override for the `genie` executable used to read the bgfx version.
    pub genie: Option<PathBuf>,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            conan_center_index: defaults::default_conan_center_index(),
            temp_dir: defaults::default_temp_dir(),
            bgfx_sha: None,
            remote_base: defaults::REMOTE_BASE.to_string(),
            genie: None,
        }
    }
}

impl UpdaterConfig {
    fn recipe_dir(&self, library: &str) -> PathBuf {
        self.conan_center_index.join("recipes").join(library)
    }

    /// `recipes/<library>/config.yml`
    pub fn config_yml(&self, library: &str) -> PathBuf {
        self.recipe_dir(library).join("config.yml")
    }

    /// `recipes/<library>/all/conandata.yml`
    pub fn conandata_yml(&self, library: &str) -> PathBuf {
        self.recipe_dir(library).join("all").join("conandata.yml")
    }

    /// `recipes/bgfx/all/conanfile.py`
    pub fn bgfx_conanfile(&self) -> PathBuf {
        self.recipe_dir("bgfx").join("all").join("conanfile.py")
    }

    pub fn genie_override(&self) -> Option<&Path> {
        self.genie.as_deref()
    }
}
