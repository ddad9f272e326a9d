//! In-memory stand-ins for git and the checkers

use crate::external::{ImportSorter, JsLinter, StyleLinter};
use crate::git::{GitError, Vcs};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub(crate) const TOKEN: &str = "2016-01-01 12:34:56.789012";

pub(crate) fn fixed_label() -> impl Fn() -> String {
    || TOKEN.to_string()
}

fn failed(command: &str) -> GitError {
    GitError::Failed {
        command: command.to_string(),
        status: "exit status: 1".to_string(),
        stderr: "fatal: simulated".to_string(),
    }
}

/// Records every git call; stash entries are kept newest first
#[derive(Default)]
pub(crate) struct FakeVcs {
    staged: Vec<String>,
    unmerged: Vec<String>,
    contents: HashMap<String, Vec<u8>>,
    stashes: RefCell<Vec<String>>,
    calls: RefCell<Vec<String>>,
    pop_fails: bool,
    save_fails: bool,
    add_fails: bool,
    list_fails: bool,
    clean_tree: bool,
    unborn: bool,
}

impl FakeVcs {
    pub fn new(staged: &[&str]) -> Self {
        Self {
            staged: staged.iter().map(|s| (*s).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_stashes(self, messages: &[&str]) -> Self {
        *self.stashes.borrow_mut() = messages.iter().map(|m| (*m).to_string()).collect();
        self
    }

    pub fn with_contents(mut self, path: &str, contents: &str) -> Self {
        self.contents
            .insert(path.to_string(), contents.as_bytes().to_vec());
        self
    }

    pub fn failing_pop(mut self) -> Self {
        self.pop_fails = true;
        self
    }

    pub fn failing_save(mut self) -> Self {
        self.save_fails = true;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.list_fails = true;
        self
    }

    /// No commit yet: `HEAD` does not resolve
    pub fn unborn(mut self) -> Self {
        self.unborn = true;
        self
    }

    /// Paths the failed pop leaves conflicted
    pub fn with_unmerged(mut self, paths: &[&str]) -> Self {
        self.unmerged = paths.iter().map(|p| (*p).to_string()).collect();
        self
    }

    pub fn failing_add(mut self) -> Self {
        self.add_fails = true;
        self
    }

    /// `stash save` succeeds without creating an entry
    pub fn clean_tree(mut self) -> Self {
        self.clean_tree = true;
        self
    }

    pub fn push_stash(&self, message: &str) {
        self.stashes.borrow_mut().insert(0, message.to_string());
    }

    pub fn stash_messages(&self) -> Vec<String> {
        self.stashes.borrow().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(prefix))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl Vcs for FakeVcs {
    fn staged_files(&self, diff_filter: &str) -> Result<Vec<String>, GitError> {
        self.record(format!("diff-index {diff_filter}"));
        Ok(self.staged.clone())
    }

    fn unmerged_files(&self) -> Result<Vec<String>, GitError> {
        self.record("diff unmerged".to_string());
        Ok(self.unmerged.clone())
    }

    /// Not recorded; it only decides how other commands are issued
    fn head_exists(&self) -> Result<bool, GitError> {
        Ok(!self.unborn)
    }

    fn staged_contents(&self, path: &str) -> Result<Vec<u8>, GitError> {
        self.record(format!("show :{path}"));
        if self.unmerged.iter().any(|unmerged| unmerged == path) {
            return Err(failed("git show"));
        }
        Ok(self
            .contents
            .get(path)
            .cloned()
            .unwrap_or_else(|| b"content".to_vec()))
    }

    fn add(&self, path: &str) -> Result<(), GitError> {
        self.record(format!("add {path}"));
        if self.add_fails {
            return Err(failed("git add"));
        }
        Ok(())
    }

    fn stash_save(&self, label: &str) -> Result<(), GitError> {
        self.record(format!("stash save {label}"));
        if self.save_fails {
            return Err(failed("git stash save"));
        }
        if !self.clean_tree {
            self.push_stash(&format!("On main: {label}"));
        }
        Ok(())
    }

    fn stash_list(&self) -> Result<Vec<String>, GitError> {
        self.record("stash list".to_string());
        if self.list_fails {
            return Err(failed("git stash list"));
        }
        Ok(self
            .stashes
            .borrow()
            .iter()
            .enumerate()
            .map(|(index, message)| format!("stash@{{{index}}}: {message}"))
            .collect())
    }

    fn stash_pop(&self, slot: &str) -> Result<bool, GitError> {
        self.record(format!("stash pop {slot}"));
        if self.pop_fails {
            return Ok(false);
        }
        let index: usize = slot
            .trim_start_matches("stash@{")
            .trim_end_matches('}')
            .parse()
            .map_err(|_| failed("git stash pop"))?;
        self.stashes.borrow_mut().remove(index);
        Ok(true)
    }
}

/// Import sorter that only records what it was asked to do
#[derive(Default)]
pub(crate) struct FakeSorter {
    incorrectly_sorted: bool,
    calls: RefCell<Vec<String>>,
}

impl FakeSorter {
    pub fn reporting(incorrectly_sorted: bool) -> Self {
        Self {
            incorrectly_sorted,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ImportSorter for FakeSorter {
    fn rewrite(&self, path: &str) -> anyhow::Result<()> {
        self.calls.borrow_mut().push(format!("rewrite {path}"));
        Ok(())
    }

    fn check(&self, path: &str, contents: &str) -> anyhow::Result<bool> {
        self.calls
            .borrow_mut()
            .push(format!("check {path} {contents}"));
        Ok(self.incorrectly_sorted)
    }
}

/// One recorded style-lint run: the files, the directory, and what each file held
pub(crate) struct LintRun {
    pub files: Vec<String>,
    pub dir: PathBuf,
    pub contents: Vec<String>,
}

#[derive(Default)]
pub(crate) struct FakeStyleLinter {
    report: Vec<String>,
    runs: RefCell<Vec<LintRun>>,
}

impl FakeStyleLinter {
    pub fn reporting(report: &[&str]) -> Self {
        Self {
            report: report.iter().map(|line| (*line).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn runs(&self) -> std::cell::Ref<'_, Vec<LintRun>> {
        self.runs.borrow()
    }
}

impl StyleLinter for FakeStyleLinter {
    fn lint(&self, files: &[String], dir: &Path) -> anyhow::Result<Vec<String>> {
        let contents = files
            .iter()
            .map(|file| std::fs::read_to_string(dir.join(file)).unwrap_or_default())
            .collect();
        self.runs.borrow_mut().push(LintRun {
            files: files.to_vec(),
            dir: dir.to_path_buf(),
            contents,
        });
        Ok(self.report.clone())
    }
}

#[derive(Default)]
pub(crate) struct FakeJsLinter {
    code: u32,
    runs: RefCell<Vec<Vec<String>>>,
}

impl FakeJsLinter {
    pub fn exiting(code: u32) -> Self {
        Self {
            code,
            ..Self::default()
        }
    }

    pub fn runs(&self) -> Vec<Vec<String>> {
        self.runs.borrow().clone()
    }
}

impl JsLinter for FakeJsLinter {
    fn lint(&self, files: &[String], _dir: &Path) -> anyhow::Result<u32> {
        self.runs.borrow_mut().push(files.to_vec());
        Ok(self.code)
    }
}
