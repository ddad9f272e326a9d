//! Git integration layer for precog
//!
//! Two sides live here:
//! - [`Vcs`], the handful of git commands the pre-commit workflow needs
//!   (staged listing, index reads, `add`, and the stash save/list/pop cycle),
//!   implemented by [`GitCli`] on top of the `git` executable.
//! - [`GitOperations`], a git2 handle used for repository discovery and
//!   hook installation.

mod command;
mod repository;
pub mod stash;

pub use command::GitCli;
pub use repository::GitOperations;
pub use stash::{LabelSource, StashRecord, SystemClock};

use thiserror::Error;

/// Diff filter selecting everything staged except pure deletions
pub const STAGED_FILTER: &str = "ACMRTUXB";

/// Failure of a single git invocation
#[derive(Debug, Error)]
pub enum GitError {
    /// The git executable could not be started at all
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Git ran but reported failure
    #[error("`{command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Version-control operations used by the hooks.
///
/// Every method is a blocking call. Paths are relative to the repository root.
pub trait Vcs {
    /// Paths staged relative to HEAD, restricted by a `--diff-filter` spec
    fn staged_files(&self, diff_filter: &str) -> Result<Vec<String>, GitError>;

    /// Paths left with unresolved merge conflicts in the index
    fn unmerged_files(&self) -> Result<Vec<String>, GitError>;

    /// Whether `HEAD` resolves; it does not before the first commit
    fn head_exists(&self) -> Result<bool, GitError>;

    /// Exact bytes currently in the index for `path`
    fn staged_contents(&self, path: &str) -> Result<Vec<u8>, GitError>;

    /// Stage the working-tree version of `path`
    fn add(&self, path: &str) -> Result<(), GitError>;

    /// Shelve unstaged changes under `label`, keeping the index intact
    fn stash_save(&self, label: &str) -> Result<(), GitError>;

    /// Raw `git stash list` lines, newest first
    fn stash_list(&self) -> Result<Vec<String>, GitError>;

    /// Restore and drop one stash entry. `Ok(false)` means git exited non-zero,
    /// typically because the pop hit merge conflicts.
    fn stash_pop(&self, slot: &str) -> Result<bool, GitError>;
}
