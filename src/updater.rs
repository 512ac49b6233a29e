//! Orchestrator for a complete update run
//!
//! This module coordinates the stages of an update into a single call:
//! 1. Synchronize the bx, bimg and bgfx clones
//! 2. Derive the version triple
//! 3. Download and hash the three source archives
//! 4. Patch `config.yml`, `conandata.yml` and the bgfx `conanfile.py`
//!
//! Each stage consumes the output of the previous one, so they run strictly
//! in sequence. There is no rollback: if a later write fails, files patched
//! earlier in the run stay patched.

use std::fs;

use log::info;

use crate::archive::{self, ArchiveRecord, CurlDownloader, Downloader};
use crate::config::UpdaterConfig;
use crate::error::Result;
use crate::metadata::{self, FolderEntry, SourceEntry, SOURCES_SECTION, VERSIONS_SECTION};
use crate::recipe;
use crate::repository::{GitOperations, SourceTrees, Synchronizer, SystemGit};
use crate::version::{self, VersionTriple};

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub versions: VersionTriple,
    pub bx: ArchiveRecord,
    pub bimg: ArchiveRecord,
    pub bgfx: ArchiveRecord,
}

impl UpdateReport {
    /// `(library, version, archive)` for each library, in bx, bimg, bgfx order.
    pub fn entries(&self) -> [(&'static str, &str, &ArchiveRecord); 3] {
        [
            ("bx", self.versions.bx.as_str(), &self.bx),
            ("bimg", self.versions.bimg.as_str(), &self.bimg),
            ("bgfx", self.versions.bgfx.as_str(), &self.bgfx),
        ]
    }
}

/// Runs the update pipeline against one configuration.
pub struct Updater {
    config: UpdaterConfig,
    git: Box<dyn GitOperations>,
    downloader: Box<dyn Downloader>,
}

impl Updater {
    /// An updater using the system `git` and `curl`.
    pub fn new(config: UpdaterConfig) -> Self {
        Self::with_operations(config, Box::new(SystemGit), Box::new(CurlDownloader))
    }

    /// An updater with custom git and download implementations.
    pub fn with_operations(
        config: UpdaterConfig,
        git: Box<dyn GitOperations>,
        downloader: Box<dyn Downloader>,
    ) -> Self {
        Self {
            config,
            git,
            downloader,
        }
    }

    /// Execute the complete update.
    pub fn run(&self) -> Result<UpdateReport> {
        let config = &self.config;
        fs::create_dir_all(&config.temp_dir)?;

        // Stage 1: Synchronize repositories
        let mut trees = SourceTrees::new(&config.temp_dir, &config.remote_base);
        Synchronizer::new(self.git.as_ref()).sync(&mut trees, config.bgfx_sha.as_deref())?;

        // Stage 2: Derive versions
        let versions = version::derive(self.git.as_ref(), &trees, config.genie_override())?;

        // Stage 3: Fetch and hash archives
        let downloader = self.downloader.as_ref();
        let report = UpdateReport {
            bx: archive::fetch(downloader, &config.temp_dir, &config.remote_base, &trees.bx)?,
            bimg: archive::fetch(downloader, &config.temp_dir, &config.remote_base, &trees.bimg)?,
            bgfx: archive::fetch(downloader, &config.temp_dir, &config.remote_base, &trees.bgfx)?,
            versions,
        };

        // Stage 4: Patch recipes
        self.patch_recipes(&report)?;

        info!("Update complete");
        Ok(report)
    }

    fn patch_recipes(&self, report: &UpdateReport) -> Result<()> {
        let config = &self.config;

        for (library, version, _) in report.entries() {
            metadata::update_file(
                &config.config_yml(library),
                VERSIONS_SECTION,
                version,
                &FolderEntry::all(),
            )?;
        }

        for (library, version, record) in report.entries() {
            metadata::update_file(
                &config.conandata_yml(library),
                SOURCES_SECTION,
                version,
                &SourceEntry {
                    url: record.url.clone(),
                    sha256: record.sha256.clone(),
                },
            )?;
        }

        recipe::update_conanfile(&config.bgfx_conanfile(), &report.versions)
    }
}
