//! Stash list entries and the labels precog shelves changes under

use chrono::{Local, NaiveDateTime};

/// Prefix of every stash message precog creates
pub const LABEL_PREFIX: &str = "Precog save - ";

/// Produces the uniqueness token embedded in each stash label
pub trait LabelSource {
    fn token(&self) -> String;
}

/// Closures work as label sources, which keeps tests deterministic
impl<F> LabelSource for F
where
    F: Fn() -> String,
{
    fn token(&self) -> String {
        self()
    }
}

/// Wall-clock tokens with microsecond resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl LabelSource for SystemClock {
    fn token(&self) -> String {
        format_token(Local::now().naive_local())
    }
}

/// `2016-01-01 12:34:56.789012`
pub fn format_token(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Full stash message for a token
pub fn stash_label(token: &str) -> String {
    format!("{LABEL_PREFIX}{token}")
}

/// One line of `git stash list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashRecord {
    /// `stash@{N}`
    pub slot: String,
    /// Message as stored by git, usually with `On <branch>: ` in front
    pub message: String,
}

impl StashRecord {
    /// Parse `stash@{0}: On main: message`. Lines without a `: ` separator are rejected.
    pub fn parse(line: &str) -> Option<Self> {
        let (slot, message) = line.trim().split_once(": ")?;
        Some(Self {
            slot: slot.to_string(),
            message: message.to_string(),
        })
    }

    /// Git prepends branch metadata to the message, so labels match by suffix
    pub fn has_label(&self, label: &str) -> bool {
        self.message.ends_with(label)
    }
}

/// First entry in `lines` whose message ends with `label`
pub fn find_by_label<S: AsRef<str>>(lines: &[S], label: &str) -> Option<StashRecord> {
    lines
        .iter()
        .filter_map(|line| StashRecord::parse(line.as_ref()))
        .find(|record| record.has_label(label))
}
