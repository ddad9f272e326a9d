use anyhow::Result;
use clap::Parser;
use precog::Cli;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    cli.run()
}
