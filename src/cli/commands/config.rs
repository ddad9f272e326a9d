//! `precog config`: show what a hook run would use

use crate::cli::Output;
use crate::config::options::Resolved;
use crate::config::{self, Settings};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ConfigArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Toml,
}

#[derive(Serialize)]
struct ConfigReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<PathBuf>,
    settings: Settings,
    sources: Vec<Resolved>,
}

pub fn execute(args: ConfigArgs, config_path: Option<&Path>, output: &Output) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let config_file = config::locate_config(config_path, &current_dir)?;
    let layers = config::load_layers(config_path, &current_dir)?;

    let report = ConfigReport {
        config_file,
        settings: Settings::resolve(&layers)?,
        sources: layers.resolve_all()?,
    };

    match args.format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize configuration as JSON")?;
            println!("{json}");
        }
        Format::Toml => {
            let toml = toml::to_string_pretty(&report)
                .context("Failed to serialize configuration as TOML")?;
            print!("{toml}");
        }
        Format::Text => print_text(&report, output),
    }
    Ok(())
}

fn print_text(report: &ConfigReport, output: &Output) {
    output.header("Options");
    let file = report
        .config_file
        .as_ref()
        .map_or_else(|| "(none)".to_string(), |path| path.display().to_string());
    output.table_row("config file", &file);

    for resolved in &report.sources {
        let value = resolved
            .value
            .as_ref()
            .map_or_else(|| "unset".to_string(), ToString::to_string);
        let source = match resolved.borrowed_from {
            Some(target) => format!("{}, from {target}", resolved.tier),
            None => resolved.tier.to_string(),
        };
        output.table_row(resolved.name, &format!("{value} ({source})"));
    }
}
