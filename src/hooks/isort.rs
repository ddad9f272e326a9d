//! Import sorting on commit
//!
//! In check mode the staged content of every staged Python file is fed to the
//! sorter and incorrectly sorted files are counted. In force mode the files
//! are rewritten in place and re-staged, inside a [`with_stash`] scope so
//! unstaged edits stay out of the commit; once the stash is back a second
//! rewrite pass tidies whatever the pop merged in.
//!
//! Before the first commit there is nothing to stash against, so force mode
//! falls back to checking.

use super::CheckReport;
use super::stash::with_stash;
use crate::external::ImportSorter;
use crate::git::{LabelSource, STAGED_FILTER, Vcs};
use crate::shared::patterns::{PYTHON_FILES, find_matching_files};
use anyhow::{Context, Result};

/// Outcome of one import-sort run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsortReport {
    pub check: CheckReport,
    /// `false` when the stash could not be popped cleanly
    pub restored: bool,
}

pub struct IsortHook<'a> {
    vcs: &'a dyn Vcs,
    sorter: &'a dyn ImportSorter,
    labels: &'a dyn LabelSource,
}

impl<'a> IsortHook<'a> {
    pub fn new(
        vcs: &'a dyn Vcs,
        sorter: &'a dyn ImportSorter,
        labels: &'a dyn LabelSource,
    ) -> Self {
        Self {
            vcs,
            sorter,
            labels,
        }
    }

    /// Check or fix every staged Python file.
    ///
    /// Fails when unstaged changes cannot be shelved or a rewritten file cannot
    /// be re-staged. A dirty pop is not an error: it is reported through
    /// [`IsortReport::restored`] and the trailing rewrite pass is skipped.
    pub fn run(&self, strict: bool, force: bool) -> Result<IsortReport> {
        let force = force && self.can_stash()?;

        let staged = self
            .vcs
            .staged_files(STAGED_FILTER)
            .context("Failed to list staged files")?;
        let files = find_matching_files(&staged, PYTHON_FILES);
        tracing::debug!("isort: {} staged python file(s)", files.len());

        let guarded = with_stash(self.vcs, self.labels, force, || {
            self.process(&files, force)
        })
        .context("Failed to stash unstaged changes")?;

        let restored = guarded.outcome.success;
        if !restored {
            tracing::debug!("skipping the trailing isort pass after a dirty pop");
        }

        let unsorted = guarded.result?;

        if restored && force {
            for file in &files {
                self.sorter.rewrite(file)?;
            }
        }

        Ok(IsortReport {
            check: CheckReport::new(unsorted, strict, files),
            restored,
        })
    }

    /// `git stash` needs a commit to stash against
    fn can_stash(&self) -> Result<bool> {
        let head = self
            .vcs
            .head_exists()
            .context("Failed to resolve HEAD")?;
        if !head {
            tracing::warn!(
                "no commit yet to stash against, checking imports instead of fixing them"
            );
        }
        Ok(head)
    }

    /// The guarded part of a run; returns the incorrectly sorted files
    fn process(&self, files: &[String], force: bool) -> Result<Vec<String>> {
        let mut unsorted = Vec::new();

        for file in files {
            if force {
                self.sorter.rewrite(file)?;
                self.vcs
                    .add(file)
                    .with_context(|| format!("Failed to re-stage {file}"))?;
                continue;
            }

            let staged = self
                .vcs
                .staged_contents(file)
                .with_context(|| format!("Failed to read staged content of {file}"))?;
            let contents = String::from_utf8(staged)
                .with_context(|| format!("Staged content of {file} is not valid UTF-8"))?;

            if self.sorter.check(file, &contents)? {
                tracing::info!("{file}: imports are incorrectly sorted");
                unsorted.push(file.clone());
            }
        }

        Ok(unsorted)
    }
}
