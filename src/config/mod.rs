//! Configuration management for precog
//!
//! Options are resolved once per run into an immutable [`Settings`]. The
//! lookup order is environment, then the caller's defaults file, then the
//! built-in table in [`options::OPTIONS`].
//!
//! A defaults file is a flat mapping of option names:
//!
//! ```toml
//! # precog.toml
//! strict = false
//! isort_force = true
//! flake8_complexity = 12
//! flake8_ignore = "E501"
//! ```

pub mod options;
mod smart_load;

use anyhow::{Context, Result};
use figment::Figment;
use options::{Builtin, Kind, Layers, OPTIONS, RawValue};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File names searched for caller defaults, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "precog.toml",
    ".precog.toml",
    "precog.yaml",
    "precog.yml",
    "precog.json",
];

/// Fully resolved options for one hook run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub strict: bool,
    pub isort: IsortSettings,
    pub flake8: Flake8Settings,
    pub eslint: EslintSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsortSettings {
    pub strict: bool,
    /// Rewrite and re-stage files instead of only checking them
    pub force: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flake8Settings {
    pub strict: bool,
    /// McCabe threshold, negative disables it
    pub complexity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore: Option<String>,
    /// Lint the working tree instead of the staged content
    pub lazy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EslintSettings {
    pub strict: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Resolve every option. Unparsable values are logged and replaced by their fallback.
    pub fn resolve(layers: &Layers) -> Result<Self> {
        options::validate_table(OPTIONS)?;

        Ok(Self {
            strict: bool_option(layers, "strict")?,
            isort: IsortSettings {
                strict: bool_option(layers, "isort_strict")?,
                force: bool_option(layers, "isort_force")?,
                path: text_option(layers, "isort_path")?.map(PathBuf::from),
            },
            flake8: Flake8Settings {
                strict: bool_option(layers, "flake8_strict")?,
                complexity: int_option(layers, "flake8_complexity")?,
                ignore: text_option(layers, "flake8_ignore")?,
                lazy: bool_option(layers, "flake8_lazy")?,
                path: text_option(layers, "flake8_path")?.map(PathBuf::from),
            },
            eslint: EslintSettings {
                strict: bool_option(layers, "eslint_strict")?,
                path: text_option(layers, "eslint_path")?.map(PathBuf::from),
            },
        })
    }
}

fn bool_option(layers: &Layers, name: &str) -> Result<bool> {
    let resolved = layers.resolve(name)?;
    if let Some(value) = &resolved.value {
        if let Some(parsed) = options::parse_bool(value) {
            return Ok(parsed);
        }
        invalid(resolved.borrowed_from.unwrap_or(resolved.name));
    }
    Ok(matches!(
        fallback(resolved.name, Kind::Bool),
        Some(RawValue::Bool(true))
    ))
}

fn int_option(layers: &Layers, name: &str) -> Result<i64> {
    let resolved = layers.resolve(name)?;
    if let Some(value) = &resolved.value {
        if let Some(parsed) = options::parse_int(value) {
            return Ok(parsed);
        }
        invalid(resolved.borrowed_from.unwrap_or(resolved.name));
    }
    match fallback(resolved.name, Kind::Int) {
        Some(RawValue::Int(i)) => Ok(i),
        _ => Ok(-1),
    }
}

/// Free-form values; an empty string means unset
fn text_option(layers: &Layers, name: &str) -> Result<Option<String>> {
    let resolved = layers.resolve(name)?;
    Ok(resolved
        .value
        .map(|value| value.to_string())
        .filter(|value| !value.is_empty()))
}

fn invalid(name: &str) {
    tracing::warn!("Invalid value for {name}. Ignoring.");
}

/// Built-in value of `name`, looking through one borrow
fn fallback(name: &str, kind: Kind) -> Option<RawValue> {
    let spec = options::spec(name)?;
    let builtin = match spec.builtin {
        Builtin::Borrow(target) => options::spec(target)?.builtin,
        builtin => builtin,
    };
    options::builtin_value(builtin).filter(|_| spec.kind == kind)
}

/// Find a defaults file in `start` or any parent directory
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Read a flat defaults file into the caller-defaults tier
pub fn load_defaults(path: &Path) -> Result<HashMap<String, RawValue>> {
    let defaults: HashMap<String, RawValue> = Figment::from(smart_load::auto(path))
        .extract()
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    for key in defaults.keys() {
        if options::spec(key).is_none() {
            tracing::warn!("Unknown option '{key}' in {}", path.display());
        }
    }

    Ok(defaults)
}

/// The defaults file to use: `explicit`, which must exist, or the nearest
/// file from [`CONFIG_FILE_NAMES`]
pub fn locate_config(explicit: Option<&Path>, start: &Path) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) if !path.is_file() => {
            anyhow::bail!("Config file not found: {}", path.display())
        }
        Some(path) => Ok(Some(path.to_path_buf())),
        None => Ok(find_config_file(start)),
    }
}

/// Build the lookup tiers: process environment over the defaults file
pub fn load_layers(explicit: Option<&Path>, start: &Path) -> Result<Layers> {
    let defaults = match locate_config(explicit, start)? {
        Some(path) => {
            tracing::debug!("loading defaults from {}", path.display());
            load_defaults(&path)?
        }
        None => HashMap::new(),
    };

    Ok(Layers::from_process_env(defaults))
}
