//! Thin wrappers over the system `git` binary.
//!
//! This uses the system git command, which automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Any authentication configured in ~/.gitconfig

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::process;

fn git<S: AsRef<OsStr>>(dir: &Path, args: &[S]) -> Result<String> {
    process::run("git", args, Some(dir))
}

/// Clone `url` into `target_dir`, creating the parent directory if needed.
pub fn clone(url: &str, target_dir: &Path) -> Result<()> {
    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent)?;
    }
    let args = [OsStr::new("clone"), OsStr::new(url), target_dir.as_os_str()];
    process::run("git", &args, None)?;
    Ok(())
}

/// Fast-forward the current branch to its upstream.
pub fn pull(dir: &Path) -> Result<()> {
    git(dir, &["pull", "--ff-only"])?;
    Ok(())
}

/// Check out a branch, tag or commit.
pub fn checkout(dir: &Path, rev: &str) -> Result<()> {
    git(dir, &["checkout", rev])?;
    Ok(())
}

/// Discard local modifications to `path`.
///
/// Untracked paths are skipped: `git checkout --` would fail on them.
pub fn restore_path(dir: &Path, path: &str) -> Result<()> {
    if git(dir, &["ls-files", "--", path])?.is_empty() {
        return Ok(());
    }
    git(dir, &["checkout", "--", path])?;
    Ok(())
}

/// Name of the branch `origin/HEAD` points at, e.g. `master`.
pub fn default_branch(dir: &Path) -> Result<String> {
    let symbolic = git(dir, &["symbolic-ref", "--short", "refs/remotes/origin/HEAD"])?;
    Ok(symbolic
        .strip_prefix("origin/")
        .unwrap_or(&symbolic)
        .to_string())
}

/// Full hash of `HEAD`.
pub fn head_commit(dir: &Path) -> Result<String> {
    git(dir, &["rev-parse", "HEAD"])
}

/// Number of commits reachable from `HEAD`.
pub fn revision_count(dir: &Path) -> Result<String> {
    git(dir, &["rev-list", "--count", "HEAD"])
}

/// Committer timestamp (seconds since the epoch) of `HEAD`.
pub fn commit_timestamp(dir: &Path) -> Result<String> {
    git(dir, &["log", "-1", "--format=%ct"])
}

/// Newest commit reachable from `HEAD` whose committer time is at or before
/// `timestamp`.
pub fn commit_at_or_before(dir: &Path, timestamp: &str) -> Result<String> {
    let before = format!("--before={}", timestamp);
    let hash = git(dir, &["log", "-1", "--format=%H", before.as_str()])?;
    if hash.is_empty() {
        return Err(Error::NoCommitBefore {
            repo: dir.display().to_string(),
            timestamp: timestamp.to_string(),
        });
    }
    Ok(hash)
}
