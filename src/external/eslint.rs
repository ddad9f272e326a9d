//! eslint, the JavaScript linter

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Linter whose exit code is its error count
pub trait JsLinter {
    fn lint(&self, files: &[String], dir: &Path) -> Result<u32>;
}

#[derive(Debug, Clone)]
pub struct EslintCommand {
    program: PathBuf,
}

impl EslintCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Explicit path, else the nearest `node_modules/.bin/eslint`, else `eslint` on `PATH`
    pub fn locate(explicit: Option<PathBuf>, start: &Path) -> Self {
        let program = explicit
            .or_else(|| find_node_modules_eslint(start))
            .or_else(|| which::which("eslint").ok())
            .unwrap_or_else(|| PathBuf::from("eslint"));
        Self::new(program)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl JsLinter for EslintCommand {
    fn lint(&self, files: &[String], dir: &Path) -> Result<u32> {
        tracing::debug!("running {} on {} files", self.program.display(), files.len());
        // Inherit stdio so eslint's own report reaches the terminal
        let status = Command::new(&self.program)
            .args(files)
            .current_dir(dir)
            .status()
            .with_context(|| format!("Failed to run {}", self.program.display()))?;

        Ok(status.code().map_or(1, |code| code.unsigned_abs()))
    }
}

/// Walk up from `start` looking for `node_modules`, and use its eslint if present
fn find_node_modules_eslint(start: &Path) -> Option<PathBuf> {
    let node_modules = start
        .ancestors()
        .map(|dir| dir.join("node_modules"))
        .find(|candidate| candidate.is_dir())?;

    let eslint = node_modules.join(".bin").join("eslint");
    eslint.is_file().then_some(eslint)
}
