//! Command-line interface for precog
//!
//! `precog run` is what the installed hook executes; the other commands
//! manage the hook file and show the resolved options.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod output;

pub use output::Output;

use commands::{config, install, run, uninstall};

#[derive(Parser)]
#[command(
    name = "precog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Pre-commit hook that sorts imports and lints staged Python and JavaScript",
    long_about = "precog runs isort, flake8 and eslint over the files staged for commit. \
                  With ISORT_FORCE it fixes import order in place and re-stages the result, \
                  shelving unstaged edits while it does so."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pre-commit checks on the staged files
    Run,
    /// Install the pre-commit hook into the current repository
    Install(install::InstallArgs),
    /// Remove a pre-commit hook written by precog
    Uninstall,
    /// Show the resolved options and where each came from
    Config(config::ConfigArgs),
}

impl Cli {
    pub fn run(self) -> Result<ExitCode> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Failed to change directory to {}", dir.display()))?;
        }

        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.quiet);
        let config_path = self.config.as_deref();

        match self.command {
            Commands::Run => run::execute(config_path, &output),
            Commands::Install(args) => {
                install::execute(args, &output)?;
                Ok(ExitCode::SUCCESS)
            }
            Commands::Uninstall => {
                uninstall::execute(&output)?;
                Ok(ExitCode::SUCCESS)
            }
            Commands::Config(args) => {
                config::execute(args, config_path, &output)?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // stdout belongs to the hook report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
