//! Pattern matching utilities
//!
//! Staged paths are matched against simple glob patterns to build the file
//! set each checker works on.

use regex::Regex;

/// Files the import sorter and style linter care about
pub const PYTHON_FILES: &[&str] = &["**/*.py"];

/// Files the JS linter cares about
pub const JAVASCRIPT_FILES: &[&str] = &["**/*.js"];

/// Keep the files matching any pattern, preserving input order
pub fn find_matching_files<S: AsRef<str>>(files: &[String], patterns: &[S]) -> Vec<String> {
    let compiled: Vec<Regex> = patterns
        .iter()
        .filter_map(|pattern| glob_regex(pattern.as_ref()))
        .collect();

    files
        .iter()
        .filter(|file| compiled.iter().any(|regex| regex.is_match(file)))
        .cloned()
        .collect()
}

/// Simple glob matching for file patterns
pub fn glob_match(pattern: &str, file: &str) -> bool {
    glob_regex(pattern).is_some_and(|regex| regex.is_match(file))
}

/// `**/` matches zero or more directories, `*` and `?` stay within one segment
fn glob_regex(pattern: &str) -> Option<Regex> {
    let regex_pattern = regex::escape(pattern)
        .replace(r"\*\*/", "DOUBLE_STAR_DIR")
        .replace(r"\*\*", "DOUBLE_STAR")
        .replace(r"\*", "[^/]*")
        .replace(r"\?", "[^/]")
        .replace("DOUBLE_STAR_DIR", "(?:.*/)?")
        .replace("DOUBLE_STAR", ".*");

    Regex::new(&format!("^{regex_pattern}$")).ok()
}
