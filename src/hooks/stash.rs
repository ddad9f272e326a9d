//! Shelving unstaged changes around a block that rewrites tracked files
//!
//! [`StashGuard::enter`] runs `git stash save --keep-index <label>` when asked
//! to, so a fixer can rewrite files and `git add` them without sweeping the
//! user's unstaged edits into the commit. [`StashGuard::exit`] pops that exact
//! entry again and reports whether the pop was clean. If the guard is dropped
//! without `exit` on an early return or `?`, the pop still happens. A panic
//! is not covered: release builds abort.

use crate::git::stash::{self, LabelSource};
use crate::git::{GitError, Vcs};

/// Result of closing a [`StashGuard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardOutcome {
    /// `false` when the stash list could not be read, or when the matching
    /// entry could not be popped cleanly
    pub success: bool,
}

impl GuardOutcome {
    pub const CLEAN: Self = Self { success: true };
    pub const DIRTY: Self = Self { success: false };
}

#[must_use = "dropping the guard pops the stash immediately"]
pub struct StashGuard<'a> {
    vcs: &'a dyn Vcs,
    /// Present while a shelved entry may be waiting to be restored
    label: Option<String>,
}

impl<'a> StashGuard<'a> {
    /// Shelve unstaged changes if `is_needed`. A failed `stash save` is fatal.
    pub fn enter(
        vcs: &'a dyn Vcs,
        labels: &dyn LabelSource,
        is_needed: bool,
    ) -> Result<Self, GitError> {
        if !is_needed {
            return Ok(Self { vcs, label: None });
        }

        let label = stash::stash_label(&labels.token());
        vcs.stash_save(&label)?;
        tracing::debug!("stashed unstaged changes as '{label}'");

        Ok(Self {
            vcs,
            label: Some(label),
        })
    }

    /// Label used for this scope, if shelving was requested
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Restore the shelved changes and report how that went
    pub fn exit(mut self) -> GuardOutcome {
        self.restore()
    }

    fn restore(&mut self) -> GuardOutcome {
        let Some(label) = self.label.take() else {
            return GuardOutcome::CLEAN;
        };

        let lines = match self.vcs.stash_list() {
            Ok(lines) => lines,
            Err(err) => {
                tracing::error!("could not list stashes to restore '{label}': {err}");
                return GuardOutcome::DIRTY;
            }
        };

        let Some(record) = stash::find_by_label(&lines, &label) else {
            // `stash save` on a clean tree creates no entry
            tracing::info!("No matching stash found.");
            return GuardOutcome::CLEAN;
        };

        match self.vcs.stash_pop(&record.slot) {
            Ok(true) => GuardOutcome::CLEAN,
            Ok(false) => {
                tracing::warn!("git stash pop {} did not apply cleanly", record.slot);
                GuardOutcome::DIRTY
            }
            Err(err) => {
                tracing::error!("could not pop {}: {err}", record.slot);
                GuardOutcome::DIRTY
            }
        }
    }
}

impl Drop for StashGuard<'_> {
    fn drop(&mut self) {
        if self.label.is_some() {
            let outcome = self.restore();
            tracing::debug!("stash guard released on drop: {outcome:?}");
        }
    }
}

/// Output of [`with_stash`]: the block's own result plus the restore outcome
#[derive(Debug)]
pub struct Guarded<T> {
    pub result: anyhow::Result<T>,
    pub outcome: GuardOutcome,
}

/// Run `body` inside a stash scope. The scope is closed whatever `body`
/// returns; only a failure to shelve on entry is returned as `Err`.
pub fn with_stash<T, F>(
    vcs: &dyn Vcs,
    labels: &dyn LabelSource,
    is_needed: bool,
    body: F,
) -> Result<Guarded<T>, GitError>
where
    F: FnOnce() -> anyhow::Result<T>,
{
    let guard = StashGuard::enter(vcs, labels, is_needed)?;
    let result = body();
    let outcome = guard.exit();
    Ok(Guarded { result, outcome })
}
