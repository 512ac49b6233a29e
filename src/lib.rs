//! # bgfx Conan Updater Library
//!
//! This library bumps the `bx`, `bimg` and `bgfx` recipes of a
//! conan-center-index checkout to new upstream commits. It is designed to be
//! used by the `bgfx-conan-updater` command-line tool, but every stage is
//! exposed so it can be driven or tested on its own.
//!
//! ## Quick Example
//!
//! ```
//! use bgfx_conan_updater::metadata::{prepend_entry, FolderEntry, VERSIONS_SECTION};
//! use bgfx_conan_updater::version::parse_version_output;
//!
//! let version = parse_version_output("GENie\n1.128.8808\n").unwrap();
//! assert_eq!(version, "1.128.8808");
//!
//! let config = "versions:\n  \"1.127.8725\":\n    folder: all\n";
//! let updated = prepend_entry(config, VERSIONS_SECTION, &version, &FolderEntry::all()).unwrap();
//! assert!(updated.find("1.128.8808").unwrap() < updated.find("1.127.8725").unwrap());
//! ```
//!
//! ## Core Concepts
//!
//! - **Repository synchronization (`repository`, `git`)**: clones or pulls
//!   the three upstream repositories and, when bgfx is pinned, aligns the
//!   companions to the bgfx commit time.
//! - **Version derivation (`version`)**: commit counts for bx and bimg, the
//!   `genie version` output for bgfx.
//! - **Archives (`archive`)**: commit-keyed tarball download and SHA-256.
//! - **Metadata patching (`metadata`, `recipe`)**: prepends entries to the
//!   YAML version tables and rewrites the compatibility tables embedded in
//!   the bgfx `conanfile.py`.
//!
//! ## Execution Flow
//!
//! [`updater::Updater::run`] drives the stages in order: synchronize,
//! derive versions, fetch and hash archives, patch recipes.

pub mod archive;
pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod metadata;
pub mod process;
pub mod recipe;
pub mod repository;
pub mod updater;
pub mod version;
