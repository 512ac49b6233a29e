//! CLI argument parsing and execution

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use bgfx_conan_updater::config::UpdaterConfig;
use bgfx_conan_updater::defaults;
use bgfx_conan_updater::updater::{UpdateReport, Updater};

/// Update conan-center-index for bx, bimg, and bgfx.
#[derive(Parser, Debug)]
#[command(name = "bgfx-conan-updater")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Path to the conan-center-index repository.
    #[arg(long, value_name = "DIR", default_value_os_t = defaults::default_conan_center_index())]
    conan_center_index_path: PathBuf,

    /// Path to the temporary directory.
    #[arg(long, value_name = "DIR", default_value_os_t = defaults::default_temp_dir())]
    temp_dir: PathBuf,

    /// SHA of the bgfx commit to use.
    #[arg(long, value_name = "SHA")]
    bgfx_sha: Option<String>,

    /// Base URL the bx, bimg and bgfx repositories are cloned from.
    #[arg(
        long,
        value_name = "URL",
        env = "BGFX_UPDATER_REMOTE_BASE",
        default_value = defaults::REMOTE_BASE
    )]
    remote_base: String,

    /// Path to the genie executable (defaults to the one bundled in bx).
    #[arg(long, value_name = "PATH")]
    genie: Option<PathBuf>,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Execute the update
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let config = UpdaterConfig {
            conan_center_index: self.conan_center_index_path,
            temp_dir: self.temp_dir,
            bgfx_sha: self.bgfx_sha,
            remote_base: self.remote_base,
            genie: self.genie,
        };

        let report = Updater::new(config.clone()).run().with_context(|| {
            format!(
                "Failed to update {}",
                config.conan_center_index.display()
            )
        })?;

        print_summary(&report);
        Ok(())
    }
}

/// Honour `RUST_LOG` when set, otherwise use `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn print_summary(report: &UpdateReport) {
    println!("Updated recipes:");
    for (library, version, archive) in report.entries() {
        println!("  {:<5} {:<12} {}", library, version, archive.url);
        println!("  {:<5} {:<12} sha256 {}", "", "", archive.sha256);
    }
}
