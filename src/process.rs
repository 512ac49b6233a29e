//! Synchronous invocation of external programs.
//!
//! Every external tool the updater relies on (`git`, `curl`, `genie`) goes
//! through [`run`], which blocks until the child exits and turns a non-zero
//! status into [`Error::Command`] carrying the captured stderr.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Run `program` with `args`, optionally inside `cwd`, and return its trimmed
/// standard output.
pub fn run<P, S>(program: P, args: &[S], cwd: Option<&Path>) -> Result<String>
where
    P: AsRef<OsStr>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let command_line = describe(program, args);
    match cwd {
        Some(dir) => debug!("Running `{}` in {}", command_line, dir.display()),
        None => debug!("Running `{}`", command_line),
    }

    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|e| Error::Command {
        command: command_line.clone(),
        stderr: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(Error::Command {
            command: command_line,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Render a program and its arguments the way they would be typed.
///
/// Only used for messages; non-UTF-8 bytes are shown lossily.
pub fn describe<P, S>(program: P, args: &[S]) -> String
where
    P: AsRef<OsStr>,
    S: AsRef<OsStr>,
{
    std::iter::once(program.as_ref())
        .chain(args.iter().map(AsRef::as_ref))
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}
