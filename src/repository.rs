//! # Upstream Repository Synchronization
//!
//! This module keeps local clones of bx, bimg and bgfx up to date and
//! positions them at a correlated point in history.
//!
//! ## Design
//!
//! Git access goes through the [`GitOperations`] trait so the synchronizer
//! can be driven by a fake in tests. [`SystemGit`] is the real implementation
//! and simply forwards to the functions in [`crate::git`].
//!
//! bx, bimg and bgfx are developed in lockstep but versioned independently.
//! When bgfx is pinned to a specific commit, the two companions are checked
//! out at their newest commit made at or before that bgfx commit, which
//! approximates "what upstream looked like at the time" without a pinning
//! file.

use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::git;

/// Generated by bgfx's build scripts on every `genie version` run.
pub const BGFX_GENERATED_FILE: &str = "src/version.h";

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    fn clone(&self, url: &str, target_dir: &Path) -> Result<()>;
    fn pull(&self, dir: &Path) -> Result<()>;
    fn checkout(&self, dir: &Path, rev: &str) -> Result<()>;
    fn restore_path(&self, dir: &Path, path: &str) -> Result<()>;
    fn default_branch(&self, dir: &Path) -> Result<String>;
    fn head_commit(&self, dir: &Path) -> Result<String>;
    fn revision_count(&self, dir: &Path) -> Result<String>;
    fn commit_timestamp(&self, dir: &Path) -> Result<String>;
    fn commit_at_or_before(&self, dir: &Path, timestamp: &str) -> Result<String>;
}

/// [`GitOperations`] backed by the system `git` binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGit;

impl GitOperations for SystemGit {
    fn clone(&self, url: &str, target_dir: &Path) -> Result<()> {
        git::clone(url, target_dir)
    }

    fn pull(&self, dir: &Path) -> Result<()> {
        git::pull(dir)
    }

    fn checkout(&self, dir: &Path, rev: &str) -> Result<()> {
        git::checkout(dir, rev)
    }

    fn restore_path(&self, dir: &Path, path: &str) -> Result<()> {
        git::restore_path(dir, path)
    }

    fn default_branch(&self, dir: &Path) -> Result<String> {
        git::default_branch(dir)
    }

    fn head_commit(&self, dir: &Path) -> Result<String> {
        git::head_commit(dir)
    }

    fn revision_count(&self, dir: &Path) -> Result<String> {
        git::revision_count(dir)
    }

    fn commit_timestamp(&self, dir: &Path) -> Result<String> {
        git::commit_timestamp(dir)
    }

    fn commit_at_or_before(&self, dir: &Path, timestamp: &str) -> Result<String> {
        git::commit_at_or_before(dir, timestamp)
    }
}

/// A local clone of one upstream library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    /// Library name, also the recipe directory name (`bx`, `bimg`, `bgfx`).
    pub name: String,
    pub path: PathBuf,
    pub remote_url: String,
    /// Commit `HEAD` resolved to after synchronization.
    pub commit: Option<String>,
}

impl SourceTree {
    /// A tree named `name` cloned from `<remote_base>/<name>.git` into
    /// `<temp_dir>/<name>`.
    pub fn new(name: &str, temp_dir: &Path, remote_base: &str) -> Self {
        Self {
            name: name.to_string(),
            path: temp_dir.join(name),
            remote_url: format!("{}/{}.git", remote_base.trim_end_matches('/'), name),
            commit: None,
        }
    }
}

/// The three trees the updater works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTrees {
    pub bx: SourceTree,
    pub bimg: SourceTree,
    pub bgfx: SourceTree,
}

impl SourceTrees {
    pub fn new(temp_dir: &Path, remote_base: &str) -> Self {
        Self {
            bx: SourceTree::new("bx", temp_dir, remote_base),
            bimg: SourceTree::new("bimg", temp_dir, remote_base),
            bgfx: SourceTree::new("bgfx", temp_dir, remote_base),
        }
    }
}

/// Brings the local clones up to date.
pub struct Synchronizer<'a> {
    git: &'a dyn GitOperations,
}

impl<'a> Synchronizer<'a> {
    pub fn new(git: &'a dyn GitOperations) -> Self {
        Self { git }
    }

    /// Clone the tree if absent, otherwise return to its default branch and
    /// pull.
    pub fn clone_or_pull(&self, tree: &SourceTree) -> Result<()> {
        if tree.path.exists() {
            info!("Updating {} in {}", tree.name, tree.path.display());
            let branch = self.git.default_branch(&tree.path)?;
            self.git.checkout(&tree.path, &branch)?;
            self.git.pull(&tree.path)
        } else {
            info!("Cloning {} into {}", tree.remote_url, tree.path.display());
            self.git.clone(&tree.remote_url, &tree.path)
        }
    }

    /// Synchronize all three trees and record their resolved commits.
    ///
    /// With `bgfx_sha`, bgfx is checked out at that revision and the
    /// companions are moved to their newest commit at or before its commit
    /// time. Without it every tree stays at the tip of its default branch.
    pub fn sync(&self, trees: &mut SourceTrees, bgfx_sha: Option<&str>) -> Result<()> {
        self.clone_or_pull(&trees.bx)?;
        self.clone_or_pull(&trees.bimg)?;

        if trees.bgfx.path.exists() {
            self.git
                .restore_path(&trees.bgfx.path, BGFX_GENERATED_FILE)?;
        }
        self.clone_or_pull(&trees.bgfx)?;

        if let Some(sha) = bgfx_sha {
            info!("Pinning bgfx to {}", sha);
            self.git.checkout(&trees.bgfx.path, sha)?;

            let timestamp = self.git.commit_timestamp(&trees.bgfx.path)?;
            for companion in [&trees.bx, &trees.bimg] {
                let commit = self.git.commit_at_or_before(&companion.path, &timestamp)?;
                info!(
                    "Aligning {} to {} (at or before {})",
                    companion.name, commit, timestamp
                );
                self.git.checkout(&companion.path, &commit)?;
            }
        }

        for tree in [&mut trees.bx, &mut trees.bimg, &mut trees.bgfx] {
            tree.commit = Some(self.git.head_commit(&tree.path)?);
        }
        Ok(())
    }
}
