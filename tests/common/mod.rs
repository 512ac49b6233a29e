//! Shared test utilities for integration and E2E tests.
//!
//! This module builds a self-contained world for the updater: three local
//! "upstream" repositories standing in for bx, bimg and bgfx, a seeded
//! conan-center-index checkout, and a scratch directory. Nothing touches the
//! network.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new();
//! fixture.commit("bx", "README.md", "bx", T);
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_fs::prelude::*;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::recipes;
    pub use super::{TestFixture, T};
}

/// A fixed base commit time so histories are reproducible.
pub const T: i64 = 1_700_000_000;

/// Seed contents for the conan-center-index recipes.
pub mod recipes {
    pub const CONFIG_YML: &str = r#"versions:
  "1":
    folder: all
"#;

    pub const CONANDATA_YML: &str = r#"sources:
  "1":
    url: "https://github.com/bkaradzic/bx/archive/0000.tar.gz"
    sha256: "0000"
"#;

    pub const BGFX_CONANFILE: &str = r#"from conan import ConanFile


class BgfxConan(ConanFile):
    name = "bgfx"

    @property
    def _bx_version(self):
        return {
            "1.0.0": "1",
        }

    @property
    def _bimg_version(self):
        return {
            "1.0.0": "1",
        }

    def requirements(self):
        self.requires(f"bx/{self._bx_version[self.version]}")
        self.requires(f"bimg/{self._bimg_version[self.version]}")
"#;

    /// A `genie` stand-in: checks it runs from `scripts/`, dirties the
    /// generated header the way the real tool does, and prints a version.
    pub const GENIE_STUB: &str = "#!/bin/sh\n\
test -f genie.lua || { echo 'not in scripts dir' >&2; exit 1; }\n\
echo '// regenerated' >> ../src/version.h\n\
echo 'GENie - Project generator tool'\n\
echo '9.9.9'\n";
}

/// Run git in `dir` with a fixed identity, optionally pinning the commit
/// time, and return trimmed stdout.
pub fn git(dir: &Path, args: &[&str], timestamp: Option<i64>) -> String {
    let mut cmd = Command::new("git");
    cmd.args(["-c", "user.name=Updater Test", "-c", "user.email=test@example.com"])
        .args(args)
        .current_dir(dir);
    if let Some(ts) = timestamp {
        let date = format!("{} +0000", ts);
        cmd.env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date);
    }
    let output = cmd.output().expect("Failed to spawn git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A temporary directory laid out as `upstream/`, `cci/` and `work/`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create empty upstream repositories and a seeded conan-center-index.
    pub fn new() -> Self {
        let fixture = Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        };
        for library in ["bx", "bimg", "bgfx"] {
            let repo = fixture.upstream(library);
            fs::create_dir_all(&repo).unwrap();
            git(&repo, &["init", "-q"], None);
            git(&repo, &["symbolic-ref", "HEAD", "refs/heads/master"], None);

            fixture
                .child(&format!("cci/recipes/{}/config.yml", library))
                .write_str(recipes::CONFIG_YML)
                .unwrap();
            fixture
                .child(&format!("cci/recipes/{}/all/conandata.yml", library))
                .write_str(recipes::CONANDATA_YML)
                .unwrap();
        }
        fixture
            .child("cci/recipes/bgfx/all/conanfile.py")
            .write_str(recipes::BGFX_CONANFILE)
            .unwrap();
        fixture
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Base URL the updater should clone from.
    pub fn remote_base(&self) -> String {
        self.path().join("upstream").to_string_lossy().into_owned()
    }

    /// `file://` form of [`Self::remote_base`], usable by both git and curl.
    pub fn remote_base_url(&self) -> String {
        format!("file://{}", self.remote_base())
    }

    /// Working copy of the upstream repository for `library`.
    pub fn upstream(&self, library: &str) -> PathBuf {
        self.path().join("upstream").join(format!("{}.git", library))
    }

    pub fn cci(&self) -> PathBuf {
        self.path().join("cci")
    }

    pub fn work(&self) -> PathBuf {
        self.path().join("work")
    }

    /// Commit `content` to `file` in an upstream repository and return the
    /// new commit hash.
    pub fn commit(&self, library: &str, file: &str, content: &str, timestamp: i64) -> String {
        let repo = self.upstream(library);
        let path = repo.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        self.commit_path(library, file, timestamp)
    }

    /// Commit an executable file.
    #[cfg(unix)]
    pub fn commit_executable(
        &self,
        library: &str,
        file: &str,
        content: &str,
        timestamp: i64,
    ) -> String {
        use std::os::unix::fs::PermissionsExt;

        let repo = self.upstream(library);
        let path = repo.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        self.commit_path(library, file, timestamp)
    }

    fn commit_path(&self, library: &str, file: &str, timestamp: i64) -> String {
        let repo = self.upstream(library);
        git(&repo, &["add", "--", file], None);
        git(
            &repo,
            &["commit", "-q", "-m", &format!("update {}", file)],
            Some(timestamp),
        );
        git(&repo, &["rev-parse", "HEAD"], None)
    }

    /// Add `count` filler commits one second apart starting at `start`.
    pub fn filler_commits(&self, library: &str, count: usize, start: i64) -> String {
        let mut head = String::new();
        for i in 0..count {
            head = self.commit(library, "CHANGELOG", &i.to_string(), start + i as i64);
        }
        head
    }

    /// bgfx history with the files the updater expects: `scripts/genie.lua`
    /// and the generated `src/version.h`.
    pub fn bgfx_layout(&self, timestamp: i64) -> String {
        self.commit("bgfx", "scripts/genie.lua", "-- genie script\n", timestamp);
        self.commit("bgfx", "src/version.h", "#define BGFX_API_VERSION 1\n", timestamp + 1)
    }

    /// Write an executable `genie` stand-in outside the repositories.
    #[cfg(unix)]
    pub fn genie_stub(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join("genie-stub");
        fs::write(&path, recipes::GENIE_STUB).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Place an archive where the updater caches it, so no download happens.
    pub fn seed_archive(&self, library: &str, commit: &str, content: &str) -> PathBuf {
        let path = self.work().join(format!("{}.{}.tar.gz", library, commit));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Publish an archive under the upstream tree so a `file://` download
    /// of `<remote_base>/<library>/archive/<commit>.tar.gz` succeeds.
    pub fn publish_archive(&self, library: &str, commit: &str, content: &str) {
        let path = self
            .path()
            .join("upstream")
            .join(library)
            .join("archive")
            .join(format!("{}.tar.gz", commit));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.path().join(path)).unwrap()
    }

    /// Keys of a section of a YAML file, in document order.
    pub fn yaml_keys(&self, path: &str, section: &str) -> Vec<String> {
        let parsed: serde_yaml::Value = serde_yaml::from_str(&self.read(path)).unwrap();
        parsed[section]
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| match k {
                serde_yaml::Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other).unwrap().trim().to_string(),
            })
            .collect()
    }

    /// Create a command for the binary with the fixture's directories.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bgfx-conan-updater");
        cmd.current_dir(self.path())
            .env_remove("BGFX_UPDATER_REMOTE_BASE")
            .arg("--conan-center-index-path")
            .arg(self.cci())
            .arg("--temp-dir")
            .arg(self.work());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
