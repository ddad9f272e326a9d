use crate::cli::Output;
use crate::git::GitOperations;
use anyhow::Result;
use clap::Args;

/// Marks hook files written by precog. `uninstall` removes only those;
/// `install --force` replaces any hook, marked or not.
pub const HOOK_MARKER: &str = "# precog pre-commit hook";

#[derive(Args)]
pub struct InstallArgs {
    /// Overwrite an existing pre-commit hook
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InstallArgs, output: &Output) -> Result<()> {
    let repo = GitOperations::discover(std::env::current_dir()?)?;
    let path = repo.install_hook("pre-commit", &hook_script(), args.force)?;

    output.success(&format!("Installed pre-commit hook ({})", path.display()));
    Ok(())
}

/// Shell script calling back into this executable
pub fn hook_script() -> String {
    let program = std::env::current_exe()
        .map(|exe| exe.display().to_string())
        .unwrap_or_else(|_| "precog".to_string());

    format!(
        "#!/bin/sh\n\
         {HOOK_MARKER}\n\
         #\n\
         # Options are read from the environment (STRICT, ISORT_FORCE, FLAKE8_IGNORE, ...)\n\
         # or from precog.toml in the repository.\n\
         exec \"{program}\" run\n"
    )
}
