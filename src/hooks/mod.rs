//! Git hook implementations for precog
//!
//! - `stash` - scoped shelving of unstaged changes
//! - `isort` - import sorting, optionally fixing and re-staging
//! - `flake8` - style linting of the staged content
//! - `eslint` - JavaScript linting
//! - `pre_commit` - runs the three checks in order

pub mod eslint;
pub mod flake8;
pub mod isort;
pub mod pre_commit;
pub mod stash;

pub use eslint::EslintHook;
pub use flake8::Flake8Hook;
pub use isort::{IsortHook, IsortReport};
pub use pre_commit::{HookSummary, PreCommit};
pub use stash::{GuardOutcome, Guarded, StashGuard, with_stash};

use serde::Serialize;

/// Result of one checker over the staged files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Violations found, whatever the strict flag says
    pub errors: u32,
    /// What the checker contributes to the exit code: `errors` when strict, else 0
    pub code: u32,
    /// Files the checker looked at
    pub files: Vec<String>,
    /// Per-violation lines worth showing to the user
    pub details: Vec<String>,
}

impl CheckReport {
    /// Report counting one error per detail line
    pub fn new(details: Vec<String>, strict: bool, files: Vec<String>) -> Self {
        let errors = u32::try_from(details.len()).unwrap_or(u32::MAX);
        Self::with_errors(errors, strict, files, details)
    }

    pub fn with_errors(
        errors: u32,
        strict: bool,
        files: Vec<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            errors,
            code: if strict { errors } else { 0 },
            files,
            details,
        }
    }

    /// Nothing staged for this checker
    pub fn skipped() -> Self {
        Self::with_errors(0, false, Vec::new(), Vec::new())
    }
}

/// Drop `skipped` paths from a checker's file set
fn without_skipped(mut files: Vec<String>, skipped: &[String]) -> Vec<String> {
    files.retain(|file| {
        let skip = skipped.contains(file);
        if skip {
            tracing::warn!("skipping {file}: it has unresolved merge conflicts");
        }
        !skip
    });
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_report_has_zero_code() {
        let report = CheckReport::new(vec!["x".into(), "y".into()], false, vec!["a.py".into()]);
        assert_eq!(report.errors, 2);
        assert_eq!(report.code, 0);
    }

    #[test]
    fn test_strict_report_uses_error_count() {
        let report = CheckReport::with_errors(3, true, Vec::new(), Vec::new());
        assert_eq!(report.code, 3);
        assert_eq!(CheckReport::skipped().code, 0);
    }
}
