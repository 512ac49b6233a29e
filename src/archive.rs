//! Source archive download and hashing.
//!
//! Each synchronized tree is published by its host as a tarball keyed by
//! commit hash. Archives are cached on disk under a name that includes the
//! commit, so re-running the updater against the same revision does not
//! download again.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::info;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::process;
use crate::repository::SourceTree;

/// A downloaded archive and its digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    pub url: String,
    pub path: PathBuf,
    pub sha256: String,
}

/// Fetches a URL into a local file.
pub trait Downloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// [`Downloader`] that shells out to `curl`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurlDownloader;

impl Downloader for CurlDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let args = [
            OsStr::new("-L"),
            OsStr::new("--fail"),
            OsStr::new("-sS"),
            OsStr::new("-o"),
            dest.as_os_str(),
            OsStr::new(url),
        ];
        process::run("curl", &args, None)
            .map(|_| ())
            .map_err(|err| match err {
                Error::Command { stderr, .. } => Error::Download {
                    url: url.to_string(),
                    stderr,
                },
                other => other,
            })
    }
}

/// `<remote_base>/<name>/archive/<commit>.tar.gz`
pub fn archive_url(remote_base: &str, name: &str, commit: &str) -> String {
    format!(
        "{}/{}/archive/{}.tar.gz",
        remote_base.trim_end_matches('/'),
        name,
        commit
    )
}

/// `<dir>/<name>.<commit>.tar.gz`
pub fn archive_path(dir: &Path, name: &str, commit: &str) -> PathBuf {
    dir.join(format!("{}.{}.tar.gz", name, commit))
}

/// Download `url` to `dest` unless `dest` already exists.
///
/// The transfer goes to a sibling `.part` file that is renamed into place
/// only after the downloader succeeds.
pub fn download_cached(downloader: &dyn Downloader, url: &str, dest: &Path) -> Result<()> {
    if dest.exists() {
        info!("Using cached archive {}", dest.display());
        return Ok(());
    }

    let mut partial = dest.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    info!("Downloading {}", url);
    if let Err(err) = downloader.download(url, &partial) {
        let _ = fs::remove_file(&partial);
        return Err(err);
    }
    fs::rename(&partial, dest)?;
    Ok(())
}

/// Compute the SHA-256 hash of a file as lowercase hex.
pub fn sha256_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();

    let mut buffer = [0u8; 65536]; // 64KB buffer
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Download (or reuse) the archive for `tree` at its resolved commit and hash
/// it.
pub fn fetch(
    downloader: &dyn Downloader,
    dir: &Path,
    remote_base: &str,
    tree: &SourceTree,
) -> Result<ArchiveRecord> {
    let commit = tree
        .commit
        .as_deref()
        .ok_or_else(|| Error::Unsynchronized {
            repo: tree.name.clone(),
        })?;

    let url = archive_url(remote_base, &tree.name, commit);
    let path = archive_path(dir, &tree.name, commit);
    download_cached(downloader, &url, &path)?;
    let sha256 = sha256_file(&path)?;

    Ok(ArchiveRecord { url, path, sha256 })
}
