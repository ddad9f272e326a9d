//! External checker processes
//!
//! Thin wrappers around the tools precog drives. None of them parse or
//! analyse code themselves; they build a command line, run it, and translate
//! the exit status and report.

pub mod eslint;
pub mod flake8;
pub mod isort;

pub use eslint::{EslintCommand, JsLinter};
pub use flake8::{Flake8Command, StyleLinter};
pub use isort::{ImportSorter, IsortCommand};

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of one tool run
#[derive(Debug)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Run `program` with `args` from `current_dir`, optionally feeding `stdin`
pub fn run_tool<I, A>(
    program: &Path,
    args: I,
    current_dir: &Path,
    stdin: Option<&str>,
) -> Result<ToolOutput>
where
    I: IntoIterator<Item = A>,
    A: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(current_dir)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    tracing::debug!("running {:?}", cmd);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("Failed to run {}", program.display()))?;

    if let Some(input) = stdin {
        // Dropped at the end of the block so the tool sees EOF
        let mut pipe = child.stdin.take().context("Tool stdin was not captured")?;
        pipe.write_all(input.as_bytes())
            .with_context(|| format!("Failed to write to {}", program.display()))?;
    }

    let result = child
        .wait_with_output()
        .with_context(|| format!("Failed to wait for {}", program.display()))?;

    Ok(ToolOutput {
        code: result.status.code(),
        stdout: String::from_utf8_lossy(&result.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
    })
}
