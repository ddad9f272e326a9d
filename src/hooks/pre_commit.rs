//! Pre-commit hook implementation
//!
//! Runs the import sorter, then flake8, then eslint. Every check runs even
//! when an earlier one already failed, so fixes and re-staging always happen;
//! the first failing check decides the exit code.

use super::{CheckReport, EslintHook, Flake8Hook, IsortHook, IsortReport};
use crate::config::Settings;
use crate::external::{ImportSorter, JsLinter, StyleLinter};
use crate::git::{LabelSource, Vcs};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Collaborators for one pre-commit run
pub struct PreCommit<'a> {
    pub vcs: &'a dyn Vcs,
    pub sorter: &'a dyn ImportSorter,
    pub style: &'a dyn StyleLinter,
    pub js: &'a dyn JsLinter,
    pub labels: &'a dyn LabelSource,
    pub workdir: &'a Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookSummary {
    pub isort: CheckReport,
    /// `false` when the isort stash could not be popped cleanly
    pub stash_restored: bool,
    pub flake8: CheckReport,
    pub eslint: CheckReport,
}

impl HookSummary {
    /// Reports in the order they ran
    pub fn checks(&self) -> [(&'static str, &CheckReport); 3] {
        [
            ("isort", &self.isort),
            ("flake8", &self.flake8),
            ("eslint", &self.eslint),
        ]
    }

    /// First non-zero check code, kept within what a process can exit with
    pub fn exit_code(&self) -> u8 {
        self.checks()
            .iter()
            .map(|(_, report)| report.code)
            .find(|code| *code != 0)
            .map_or(0, |code| u8::try_from(code).unwrap_or(u8::MAX))
    }
}

impl PreCommit<'_> {
    pub fn run(&self, settings: &Settings) -> Result<HookSummary> {
        let isort = self.run_isort(settings)?;
        self.run_linters(settings, isort)
    }

    pub fn run_isort(&self, settings: &Settings) -> Result<IsortReport> {
        IsortHook::new(self.vcs, self.sorter, self.labels)
            .run(settings.isort.strict, settings.isort.force)
    }

    /// flake8 and eslint after `isort`. A dirty pop leaves conflicted paths
    /// without a stage-0 entry, so those are left out of both.
    pub fn run_linters(&self, settings: &Settings, isort: IsortReport) -> Result<HookSummary> {
        let IsortReport { check, restored } = isort;
        let conflicted = if restored {
            Vec::new()
        } else {
            self.vcs
                .unmerged_files()
                .context("Failed to list unmerged files")?
        };

        let flake8 = Flake8Hook::new(self.vcs, self.style, self.workdir)
            .skipping(&conflicted)
            .run(settings.flake8.strict, settings.flake8.lazy)?;

        let eslint = EslintHook::new(self.vcs, self.js, self.workdir)
            .skipping(&conflicted)
            .run(settings.eslint.strict)?;

        Ok(HookSummary {
            isort: check,
            stash_restored: restored,
            flake8,
            eslint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::{Layers, RawValue};
    use crate::testing::{FakeJsLinter, FakeSorter, FakeStyleLinter, FakeVcs, fixed_label};

    fn settings(env: &[(&str, &str)]) -> Settings {
        let layers = Layers::new(
            env.iter()
                .map(|(k, v)| ((*k).to_string(), RawValue::Str((*v).to_string()))),
            Vec::new(),
        );
        Settings::resolve(&layers).unwrap()
    }

    fn summary(
        vcs: &FakeVcs,
        sorter: &FakeSorter,
        style: &FakeStyleLinter,
        js: &FakeJsLinter,
        settings: &Settings,
    ) -> HookSummary {
        let labels = fixed_label();
        let workdir = tempfile::TempDir::new().unwrap();
        PreCommit {
            vcs,
            sorter,
            style,
            js,
            labels: &labels,
            workdir: workdir.path(),
        }
        .run(settings)
        .unwrap()
    }

    #[test]
    fn test_first_failing_check_sets_exit_code() {
        let vcs = FakeVcs::new(&["a.py", "b.py", "app.js"]);
        let sorter = FakeSorter::reporting(false);
        let style =
            FakeStyleLinter::reporting(&["a.py:1:1: F401", "b.py:2:1: E302", "b.py:9:1: W391"]);
        let js = FakeJsLinter::exiting(1);

        let summary = summary(&vcs, &sorter, &style, &js, &settings(&[]));

        assert_eq!(summary.isort.code, 0);
        assert_eq!(summary.flake8.code, 3);
        assert_eq!(summary.eslint.code, 1);
        assert_eq!(summary.exit_code(), 3);
        // eslint still ran after flake8 failed
        assert_eq!(js.runs().len(), 1);
    }

    #[test]
    fn test_lenient_everything_passes() {
        let vcs = FakeVcs::new(&["a.py", "app.js"]);
        let sorter = FakeSorter::reporting(true);
        let style = FakeStyleLinter::reporting(&["a.py:1:1: F401"]);
        let js = FakeJsLinter::exiting(1);

        let summary = summary(&vcs, &sorter, &style, &js, &settings(&[("STRICT", "false")]));

        assert_eq!(summary.exit_code(), 0);
        assert_eq!(summary.isort.errors, 1);
        assert_eq!(summary.flake8.errors, 1);
        assert_eq!(summary.eslint.errors, 1);
    }

    #[test]
    fn test_only_strict_checker_blocks() {
        let vcs = FakeVcs::new(&["a.py", "app.js"]);
        let sorter = FakeSorter::reporting(true);
        let style = FakeStyleLinter::reporting(&[]);
        let js = FakeJsLinter::exiting(4);

        let summary = summary(
            &vcs,
            &sorter,
            &style,
            &js,
            &settings(&[("STRICT", "no"), ("eslint_strict", "yes")]),
        );

        assert_eq!(summary.isort.code, 0);
        assert_eq!(summary.exit_code(), 4);
    }

    #[test]
    fn test_forced_isort_then_linters_see_fixed_files() {
        let vcs = FakeVcs::new(&["a.py"]);
        let sorter = FakeSorter::reporting(true);
        let style = FakeStyleLinter::reporting(&[]);
        let js = FakeJsLinter::exiting(0);

        let summary = summary(&vcs, &sorter, &style, &js, &settings(&[("ISORT_FORCE", "1")]));

        assert!(summary.stash_restored);
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(vcs.calls_starting_with("add"), vec!["add a.py"]);
        assert_eq!(style.runs().len(), 1);
        assert!(js.runs().is_empty());
    }

    #[test]
    fn test_dirty_pop_leaves_conflicted_files_out_of_linting() {
        let vcs = FakeVcs::new(&["a.py", "b.py", "app.js"])
            .failing_pop()
            .with_unmerged(&["a.py", "app.js"]);
        let sorter = FakeSorter::reporting(true);
        let style = FakeStyleLinter::reporting(&[]);
        let js = FakeJsLinter::exiting(1);

        let summary = summary(&vcs, &sorter, &style, &js, &settings(&[("ISORT_FORCE", "1")]));

        assert!(!summary.stash_restored);
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(style.runs()[0].files, vec!["b.py"]);
        assert_eq!(vcs.calls_starting_with("show"), vec!["show :b.py"]);
        assert!(js.runs().is_empty());
    }

    #[test]
    fn test_clean_run_does_not_look_for_conflicts() {
        let vcs = FakeVcs::new(&["a.py"]);
        let sorter = FakeSorter::reporting(false);
        let style = FakeStyleLinter::reporting(&[]);
        let js = FakeJsLinter::exiting(0);

        let summary = summary(&vcs, &sorter, &style, &js, &settings(&[("ISORT_FORCE", "1")]));

        assert!(summary.stash_restored);
        assert!(vcs.calls_starting_with("diff unmerged").is_empty());
    }

    #[test]
    fn test_exit_code_is_clamped() {
        let report = CheckReport::with_errors(300, true, Vec::new(), Vec::new());
        let summary = HookSummary {
            isort: CheckReport::skipped(),
            stash_restored: true,
            flake8: report,
            eslint: CheckReport::skipped(),
        };
        assert_eq!(summary.exit_code(), 255);
    }
}
