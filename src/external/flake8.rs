//! flake8, the style and complexity linter

use super::run_tool;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

/// Linter reporting one line per violation
pub trait StyleLinter {
    /// Lint `files` (relative to `dir`) and return the report lines
    fn lint(&self, files: &[String], dir: &Path) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct Flake8Command {
    program: PathBuf,
    /// Negative disables the McCabe check
    complexity: i64,
    ignore: Option<String>,
}

impl Flake8Command {
    pub fn new(program: Option<PathBuf>, complexity: i64, ignore: Option<String>) -> Self {
        Self {
            program: program.unwrap_or_else(|| PathBuf::from("flake8")),
            complexity,
            ignore,
        }
    }

    fn args(&self, files: &[String]) -> Vec<String> {
        let mut args = Vec::new();
        if self.complexity >= 0 {
            args.push(format!("--max-complexity={}", self.complexity));
        }
        if let Some(ignore) = &self.ignore {
            args.push(format!("--ignore={ignore}"));
        }
        args.push("--".to_string());
        args.extend(files.iter().cloned());
        args
    }
}

impl StyleLinter for Flake8Command {
    fn lint(&self, files: &[String], dir: &Path) -> Result<Vec<String>> {
        let output = run_tool(&self.program, self.args(files), dir, None)?;
        let report: Vec<String> = output
            .stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        // flake8 exits 1 for violations; a failure with no report is a crash
        if !output.success() && report.is_empty() {
            bail!("flake8 failed: {}", output.stderr.trim());
        }
        Ok(report)
    }
}
