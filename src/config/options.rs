//! Option table and the three-tier lookup
//!
//! Every tunable is named in [`OPTIONS`]. A value is taken from the first tier
//! that has it: environment variables (matched case-insensitively), then the
//! caller's defaults, then the built-in table. Some options borrow another
//! option's resolved value when neither outer tier sets them.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A value as supplied by one of the tiers, before type conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Built-in entry of the option table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Bool(bool),
    Int(i64),
    /// Take the named option's value
    Borrow(&'static str),
    /// No value; the consumer decides what absence means
    Unset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Int,
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: Kind,
    pub builtin: Builtin,
}

const fn option(name: &'static str, kind: Kind, builtin: Builtin) -> OptionSpec {
    OptionSpec {
        name,
        kind,
        builtin,
    }
}

pub const OPTIONS: &[OptionSpec] = &[
    // default for every other *_strict
    option("strict", Kind::Bool, Builtin::Bool(true)),
    option("isort_strict", Kind::Bool, Builtin::Borrow("strict")),
    // rewrite the commit to fix import order
    option("isort_force", Kind::Bool, Builtin::Bool(false)),
    option("isort_path", Kind::Text, Builtin::Unset),
    option("flake8_strict", Kind::Bool, Builtin::Borrow("strict")),
    option("flake8_complexity", Kind::Int, Builtin::Int(-1)),
    option("flake8_ignore", Kind::Text, Builtin::Unset),
    option("flake8_lazy", Kind::Bool, Builtin::Bool(false)),
    option("flake8_path", Kind::Text, Builtin::Unset),
    option("eslint_strict", Kind::Bool, Builtin::Borrow("strict")),
    option("eslint_path", Kind::Text, Builtin::Unset),
];

pub fn spec(name: &str) -> Option<&'static OptionSpec> {
    OPTIONS.iter().find(|spec| spec.name.eq_ignore_ascii_case(name))
}

/// Reject borrows of unknown options and chained borrows.
///
/// Borrowing is resolved one level deep, so a borrow target must carry its
/// own built-in value.
pub fn validate_table(table: &[OptionSpec]) -> Result<()> {
    for entry in table {
        if let Builtin::Borrow(target) = entry.builtin {
            let Some(target_spec) = table.iter().find(|spec| spec.name == target) else {
                bail!("option '{}' borrows unknown option '{target}'", entry.name);
            };
            if matches!(target_spec.builtin, Builtin::Borrow(_)) {
                bail!(
                    "option '{}' borrows '{target}', which borrows in turn",
                    entry.name
                );
            }
            if target_spec.kind != entry.kind {
                bail!("option '{}' borrows '{target}' of a different type", entry.name);
            }
        }
    }
    Ok(())
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Environment,
    Defaults,
    Builtin,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Environment => "environment",
            Self::Defaults => "defaults",
            Self::Builtin => "built-in",
        })
    }
}

/// Outcome of looking up one option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<RawValue>,
    pub tier: Tier,
    /// Set when the value was taken from another option
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowed_from: Option<&'static str>,
}

/// The two outer tiers, keys lower-cased
#[derive(Debug, Clone, Default)]
pub struct Layers {
    environment: HashMap<String, RawValue>,
    defaults: HashMap<String, RawValue>,
}

impl Layers {
    pub fn new<E, D>(environment: E, defaults: D) -> Self
    where
        E: IntoIterator<Item = (String, RawValue)>,
        D: IntoIterator<Item = (String, RawValue)>,
    {
        Self {
            environment: lower_keys(environment),
            defaults: lower_keys(defaults),
        }
    }

    /// Environment tier from the process environment. Only option names are
    /// picked up, and empty variables count as unset.
    pub fn from_process_env<D>(defaults: D) -> Self
    where
        D: IntoIterator<Item = (String, RawValue)>,
    {
        let environment = std::env::vars_os().filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            let value = value.into_string().ok()?;
            (spec(&key).is_some() && !value.is_empty()).then(|| (key, RawValue::Str(value)))
        });
        Self::new(environment, defaults)
    }

    fn lookup(&self, name: &str) -> Option<(RawValue, Tier)> {
        if let Some(value) = self.environment.get(name) {
            return Some((value.clone(), Tier::Environment));
        }
        self.defaults
            .get(name)
            .map(|value| (value.clone(), Tier::Defaults))
    }

    /// Resolve `name` through the tiers, following a borrow one level
    pub fn resolve(&self, name: &str) -> Result<Resolved> {
        let Some(entry) = spec(name) else {
            bail!("unknown option '{name}'");
        };

        if let Some((value, tier)) = self.lookup(entry.name) {
            return Ok(Resolved {
                name: entry.name,
                value: Some(value),
                tier,
                borrowed_from: None,
            });
        }

        match entry.builtin {
            Builtin::Borrow(target) => {
                let target_spec = spec(target)
                    .filter(|spec| !matches!(spec.builtin, Builtin::Borrow(_)));
                let Some(target_spec) = target_spec else {
                    bail!("option '{name}' has an unsupported borrow of '{target}'");
                };
                let (value, tier) = match self.lookup(target_spec.name) {
                    Some((value, tier)) => (Some(value), tier),
                    None => (builtin_value(target_spec.builtin), Tier::Builtin),
                };
                Ok(Resolved {
                    name: entry.name,
                    value,
                    tier,
                    borrowed_from: Some(target_spec.name),
                })
            }
            builtin => Ok(Resolved {
                name: entry.name,
                value: builtin_value(builtin),
                tier: Tier::Builtin,
                borrowed_from: None,
            }),
        }
    }

    /// Every option in table order
    pub fn resolve_all(&self) -> Result<Vec<Resolved>> {
        OPTIONS.iter().map(|spec| self.resolve(spec.name)).collect()
    }
}

fn lower_keys<I>(entries: I) -> HashMap<String, RawValue>
where
    I: IntoIterator<Item = (String, RawValue)>,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect()
}

pub(crate) fn builtin_value(builtin: Builtin) -> Option<RawValue> {
    match builtin {
        Builtin::Bool(b) => Some(RawValue::Bool(b)),
        Builtin::Int(i) => Some(RawValue::Int(i)),
        Builtin::Borrow(_) | Builtin::Unset => None,
    }
}

/// Accepts `true/false`, `yes/no`, `on/off` and `1/0`, ignoring case
pub fn parse_bool(value: &RawValue) -> Option<bool> {
    match value {
        RawValue::Bool(b) => Some(*b),
        RawValue::Int(0) => Some(false),
        RawValue::Int(1) => Some(true),
        RawValue::Int(_) => None,
        RawValue::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
    }
}

pub fn parse_int(value: &RawValue) -> Option<i64> {
    match value {
        RawValue::Int(i) => Some(*i),
        RawValue::Str(s) => s.trim().parse().ok(),
        RawValue::Bool(_) => None,
    }
}
