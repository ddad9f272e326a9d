//! Style linting of staged Python files
//!
//! Unless running lazily, the linter never sees the working tree: the staged
//! content of every file is written to a scratch directory under the same
//! relative paths and flake8 runs there.

use super::{CheckReport, without_skipped};
use crate::external::StyleLinter;
use crate::git::{STAGED_FILTER, Vcs};
use crate::shared::patterns::{PYTHON_FILES, find_matching_files};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// flake8 settings files carried into the scratch directory
const FLAKE8_CONFIG_FILES: &[&str] = &["setup.cfg", "tox.ini", ".flake8"];

pub struct Flake8Hook<'a> {
    vcs: &'a dyn Vcs,
    linter: &'a dyn StyleLinter,
    workdir: &'a Path,
    /// Paths left unmerged by a dirty stash pop
    skipped: Vec<String>,
}

impl<'a> Flake8Hook<'a> {
    pub fn new(vcs: &'a dyn Vcs, linter: &'a dyn StyleLinter, workdir: &'a Path) -> Self {
        Self {
            vcs,
            linter,
            workdir,
            skipped: Vec::new(),
        }
    }

    /// Leave `paths` out of the run; they have no stage-0 index entry to read
    pub fn skipping(mut self, paths: &[String]) -> Self {
        self.skipped = paths.to_vec();
        self
    }

    pub fn run(&self, strict: bool, lazy: bool) -> Result<CheckReport> {
        let staged = self
            .vcs
            .staged_files(STAGED_FILTER)
            .context("Failed to list staged files")?;
        let files = without_skipped(find_matching_files(&staged, PYTHON_FILES), &self.skipped);
        if files.is_empty() {
            return Ok(CheckReport::skipped());
        }

        let report = if lazy {
            self.linter.lint(&files, self.workdir)?
        } else {
            let scratch = self.materialize(&files)?;
            self.linter.lint(&files, scratch.path())?
        };

        Ok(CheckReport::new(report, strict, files))
    }

    /// Write the staged version of `files` into a fresh temporary directory
    fn materialize(&self, files: &[String]) -> Result<TempDir> {
        let scratch = tempfile::Builder::new()
            .prefix("precog-flake8-")
            .tempdir()
            .context("Failed to create scratch directory")?;

        for file in files {
            let target = scratch.path().join(file);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let contents = self
                .vcs
                .staged_contents(file)
                .with_context(|| format!("Failed to read staged content of {file}"))?;
            fs::write(&target, contents)
                .with_context(|| format!("Failed to write {}", target.display()))?;
        }

        for name in FLAKE8_CONFIG_FILES {
            let source = self.workdir.join(name);
            if source.is_file() {
                fs::copy(&source, scratch.path().join(name))
                    .with_context(|| format!("Failed to copy {}", source.display()))?;
            }
        }

        tracing::debug!(
            "staged content of {} file(s) written to {}",
            files.len(),
            scratch.path().display()
        );
        Ok(scratch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeStyleLinter, FakeVcs};

    const REPORT: &[&str] = &[
        "./pkg/mod.py:1:1: F401 'os' imported but unused",
        "./pkg/mod.py:3:80: E501 line too long (88 > 79 characters)",
    ];

    #[test]
    fn test_lints_staged_content_in_scratch_dir() {
        let workdir = TempDir::new().unwrap();
        std::fs::write(workdir.path().join("setup.cfg"), "[flake8]\n").unwrap();
        let vcs = FakeVcs::new(&["pkg/mod.py", "notes.txt"])
            .with_contents("pkg/mod.py", "import os\n");
        let linter = FakeStyleLinter::reporting(REPORT);

        let report = Flake8Hook::new(&vcs, &linter, workdir.path())
            .run(true, false)
            .unwrap();

        assert_eq!(report.errors, 2);
        assert_eq!(report.code, 2);
        assert_eq!(report.details, REPORT);

        let runs = linter.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].files, vec!["pkg/mod.py"]);
        assert_eq!(runs[0].contents, vec!["import os\n"]);
        assert_ne!(runs[0].dir, workdir.path());
        // scratch directory is gone once the run is over
        assert!(!runs[0].dir.exists());
    }

    #[test]
    fn test_lazy_lints_working_tree() {
        let workdir = TempDir::new().unwrap();
        let vcs = FakeVcs::new(&["a.py"]);
        let linter = FakeStyleLinter::reporting(&[]);

        let report = Flake8Hook::new(&vcs, &linter, workdir.path())
            .run(true, true)
            .unwrap();

        assert_eq!(report.code, 0);
        assert_eq!(linter.runs()[0].dir, workdir.path());
        assert!(vcs.calls_starting_with("show").is_empty());
    }

    #[test]
    fn test_lenient_mode_reports_without_failing() {
        let workdir = TempDir::new().unwrap();
        let vcs = FakeVcs::new(&["a.py"]);
        let linter = FakeStyleLinter::reporting(REPORT);

        let report = Flake8Hook::new(&vcs, &linter, workdir.path())
            .run(false, true)
            .unwrap();

        assert_eq!(report.errors, 2);
        assert_eq!(report.code, 0);
    }

    #[test]
    fn test_no_python_files_skips_linter() {
        let workdir = TempDir::new().unwrap();
        let vcs = FakeVcs::new(&["index.js"]);
        let linter = FakeStyleLinter::reporting(REPORT);

        let report = Flake8Hook::new(&vcs, &linter, workdir.path())
            .run(true, false)
            .unwrap();

        assert_eq!(report, CheckReport::skipped());
        assert!(linter.runs().is_empty());
    }
}
