//! JavaScript linting of staged files

use super::{CheckReport, without_skipped};
use crate::external::JsLinter;
use crate::git::{STAGED_FILTER, Vcs};
use crate::shared::patterns::{JAVASCRIPT_FILES, find_matching_files};
use anyhow::{Context, Result};
use std::path::Path;

pub struct EslintHook<'a> {
    vcs: &'a dyn Vcs,
    linter: &'a dyn JsLinter,
    workdir: &'a Path,
    /// Paths left unmerged by a dirty stash pop
    skipped: Vec<String>,
}

impl<'a> EslintHook<'a> {
    pub fn new(vcs: &'a dyn Vcs, linter: &'a dyn JsLinter, workdir: &'a Path) -> Self {
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

    /// Lint staged `.js` files from the working tree. eslint is not started
    /// when nothing relevant is staged.
    pub fn run(&self, strict: bool) -> Result<CheckReport> {
        let staged = self
            .vcs
            .staged_files(STAGED_FILTER)
            .context("Failed to list staged files")?;
        let files = without_skipped(find_matching_files(&staged, JAVASCRIPT_FILES), &self.skipped);
        if files.is_empty() {
            return Ok(CheckReport::skipped());
        }

        let errors = self.linter.lint(&files, self.workdir)?;
        Ok(CheckReport::with_errors(errors, strict, files, Vec::new()))
    }
}
