//! isort, the import sorter

use super::run_tool;
use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

/// Import sorter with a destructive and a read-only mode
pub trait ImportSorter {
    /// Sort the imports of `path` in place
    fn rewrite(&self, path: &str) -> Result<()>;

    /// Check `contents` as if it were the file at `path`, without touching disk.
    /// Returns `true` when the imports are incorrectly sorted.
    fn check(&self, path: &str, contents: &str) -> Result<bool>;
}

/// [`ImportSorter`] backed by the `isort` executable
#[derive(Debug, Clone)]
pub struct IsortCommand {
    program: PathBuf,
    workdir: PathBuf,
}

impl IsortCommand {
    /// `program` defaults to `isort` on `PATH`
    pub fn new(program: Option<PathBuf>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.unwrap_or_else(|| PathBuf::from("isort")),
            workdir: workdir.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl ImportSorter for IsortCommand {
    fn rewrite(&self, path: &str) -> Result<()> {
        let output = run_tool(&self.program, ["--quiet", path], &self.workdir, None)?;
        if !output.success() {
            bail!("isort could not sort {path}: {}", output.stderr.trim());
        }
        Ok(())
    }

    fn check(&self, path: &str, contents: &str) -> Result<bool> {
        // `-` reads the file from stdin, `--filename` keeps per-path settings working
        let output = run_tool(
            &self.program,
            ["--check-only", "--quiet", "--filename", path, "-"],
            &self.workdir,
            Some(contents),
        )?;

        match output.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            code => bail!(
                "isort exited with {} while checking {path}: {}",
                code.map_or_else(|| "a signal".to_string(), |c| c.to_string()),
                output.stderr.trim()
            ),
        }
    }
}
