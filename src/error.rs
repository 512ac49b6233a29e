//! # Error Handling
//!
//! This module defines the centralized error type for the updater. It uses
//! the `thiserror` library to create an `Error` enum covering every way a
//! run can fail, each variant carrying enough context to tell the operator
//! which command, file or repository was involved.
//!
//! None of these errors are retried or downgraded. A failure part-way through
//! leaves the conan-center-index checkout partially patched; since that tree
//! is itself under version control the operator resolves it with
//! `git diff` / `git checkout`.

use thiserror::Error;

/// Main error type for updater operations
#[derive(Error, Debug)]
pub enum Error {
    /// An external command could not be spawned or exited with a non-zero
    /// status.
    #[error("Command `{command}` failed with error: {stderr}")]
    Command { command: String, stderr: String },

    /// The build tool's output contained no `MAJOR.MINOR.PATCH` line.
    #[error("Version format not found in the command output:\n{output}")]
    VersionFormatNotFound { output: String },

    /// The downloader exited with a non-zero status.
    #[error("Failed to download {url} with error: {stderr}")]
    Download { url: String, stderr: String },

    /// A companion repository has no commit at or before the primary
    /// repository's commit time.
    #[error("No commit in {repo} at or before timestamp {timestamp}")]
    NoCommitBefore { repo: String, timestamp: String },

    /// A repository was used before its commit had been resolved.
    #[error("Repository {repo} has no resolved commit")]
    Unsynchronized { repo: String },

    /// A metadata file did not have the expected shape.
    #[error("Metadata error in {path}: {message}")]
    Metadata { path: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
