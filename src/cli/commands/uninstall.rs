use super::install::HOOK_MARKER;
use crate::cli::Output;
use crate::git::GitOperations;
use anyhow::Result;

pub fn execute(output: &Output) -> Result<()> {
    let repo = GitOperations::discover(std::env::current_dir()?)?;

    if repo.remove_hook("pre-commit", HOOK_MARKER)? {
        output.success("Removed pre-commit hook");
    } else {
        output.info("No pre-commit hook installed");
    }
    Ok(())
}
