//! # precog - pre-commit checks for Python and JavaScript
//!
//! precog is a git pre-commit hook. It runs isort, flake8 and eslint over the
//! files staged for commit and blocks the commit when a strict check fails.
//!
//! ## Features
//!
//! - **Staged content only**: import order and style are checked against the
//!   index, not against unstaged edits in the working tree
//! - **Fix and re-stage**: with `ISORT_FORCE` imports are sorted in place and
//!   re-staged while unstaged edits are shelved in a labelled stash
//! - **Strict or lenient per checker**: `STRICT`, `ISORT_STRICT`,
//!   `FLAKE8_STRICT` and `ESLINT_STRICT` decide what blocks a commit
//!
//! ## Quick Start
//!
//! ```bash
//! # Install the hook into the current repository
//! precog install
//!
//! # Let isort fix imports instead of rejecting the commit
//! export ISORT_FORCE=1
//! ```

pub mod cli;
pub mod config;
pub mod external;
pub mod git;
pub mod hooks;
pub mod shared;

#[cfg(test)]
pub(crate) mod testing;

pub use cli::{Cli, Output};
pub use config::Settings;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
