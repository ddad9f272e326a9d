use crate::cli::Output;
use crate::config::{self, Settings};
use crate::external::{EslintCommand, Flake8Command, IsortCommand};
use crate::git::{GitCli, GitOperations, SystemClock};
use crate::hooks::{HookSummary, PreCommit};
use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;

pub fn execute(config_path: Option<&Path>, output: &Output) -> Result<ExitCode> {
    let current_dir = std::env::current_dir()?;
    let repo = GitOperations::discover(&current_dir)?;
    let workdir = repo.workdir()?.to_path_buf();

    let layers = config::load_layers(config_path, &current_dir)?;
    let settings = Settings::resolve(&layers)?;
    tracing::debug!("resolved settings: {settings:?}");

    let git = GitCli::new(&workdir);
    let sorter = IsortCommand::new(settings.isort.path.clone(), &workdir);
    let style = Flake8Command::new(
        settings.flake8.path.clone(),
        settings.flake8.complexity,
        settings.flake8.ignore.clone(),
    );
    let js = EslintCommand::locate(settings.eslint.path.clone(), &current_dir);

    let hook = PreCommit {
        vcs: &git,
        sorter: &sorter,
        style: &style,
        js: &js,
        labels: &SystemClock,
        workdir: &workdir,
    };
    let isort = hook.run_isort(&settings)?;
    if !isort.restored {
        // printed before the linters, which may still fail on the conflicted tree
        output.warning("stash did not pop cleanly");
        output.warning("working copy may have unresolved merges");
    }
    let summary = hook.run_linters(&settings, isort)?;

    report(&summary, output);
    Ok(ExitCode::from(summary.exit_code()))
}

fn report(summary: &HookSummary, output: &Output) {
    for (name, check) in summary.checks() {
        if check.files.is_empty() {
            continue;
        }

        if check.errors == 0 {
            output.success(&format!("{name}: {} file(s) passed", check.files.len()));
            continue;
        }

        let message = match name {
            "isort" => format!("{name}: {} file(s) with incorrectly sorted imports", check.errors),
            _ => format!("{name}: {} problem(s)", check.errors),
        };
        if check.code == 0 {
            output.warning(&format!("{message} (not blocking)"));
        } else {
            output.error(&message);
        }
        for detail in &check.details {
            output.indent(detail);
        }
    }
}
