use super::{GitError, Vcs};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Object id of git's empty tree, used as the diff base before the first commit
const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// [`Vcs`] implementation that shells out to the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Run git commands from `workdir`, normally the repository root
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.workdir);
        cmd
    }

    fn output(&self, args: &[&str]) -> Result<Output, GitError> {
        tracing::debug!("running git {}", args.join(" "));
        self.command(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| GitError::Spawn {
                command: display(args),
                source,
            })
    }

    /// Run and require a zero exit status, returning stdout
    fn checked(&self, args: &[&str]) -> Result<Vec<u8>, GitError> {
        let output = self.output(args)?;
        if !output.status.success() {
            return Err(GitError::Failed {
                command: display(args),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    fn lines(&self, args: &[&str]) -> Result<Vec<String>, GitError> {
        let stdout = self.checked(args)?;
        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Paths from a `-z` listing, unquoted whatever `core.quotePath` says
    fn paths(&self, args: &[&str]) -> Result<Vec<String>, GitError> {
        Ok(split_nul(&self.checked(args)?))
    }

    /// `HEAD` when it resolves, otherwise the empty tree
    fn diff_base(&self) -> Result<&'static str, GitError> {
        Ok(if self.head_exists()? { "HEAD" } else { EMPTY_TREE })
    }
}

impl Vcs for GitCli {
    fn staged_files(&self, diff_filter: &str) -> Result<Vec<String>, GitError> {
        let filter = format!("--diff-filter={diff_filter}");
        let base = self.diff_base()?;
        self.paths(&["diff-index", "-z", "--cached", "--name-only", &filter, base])
    }

    fn unmerged_files(&self) -> Result<Vec<String>, GitError> {
        self.paths(&["diff", "-z", "--name-only", "--diff-filter=U"])
    }

    fn head_exists(&self) -> Result<bool, GitError> {
        let output = self.output(&["rev-parse", "--verify", "--quiet", "HEAD"])?;
        Ok(output.status.success())
    }

    fn staged_contents(&self, path: &str) -> Result<Vec<u8>, GitError> {
        self.checked(&["show", &format!(":{path}")])
    }

    fn add(&self, path: &str) -> Result<(), GitError> {
        self.checked(&["add", "--", path]).map(drop)
    }

    fn stash_save(&self, label: &str) -> Result<(), GitError> {
        let stdout = self.checked(&["stash", "save", "--keep-index", label])?;
        tracing::debug!("{}", String::from_utf8_lossy(&stdout).trim());
        Ok(())
    }

    fn stash_list(&self) -> Result<Vec<String>, GitError> {
        self.lines(&["stash", "list"])
    }

    fn stash_pop(&self, slot: &str) -> Result<bool, GitError> {
        let args = ["stash", "pop", slot];
        tracing::debug!("running git {}", args.join(" "));
        // Output is inherited so conflict details reach the user
        let status = self
            .command(&args)
            .status()
            .map_err(|source| GitError::Spawn {
                command: display(&args),
                source,
            })?;
        Ok(status.success())
    }
}

fn display(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}

fn split_nul(stdout: &[u8]) -> Vec<String> {
    stdout
        .split(|byte| *byte == 0)
        .filter(|path| !path.is_empty())
        .map(|path| String::from_utf8_lossy(path).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_nul_keeps_paths_verbatim() {
        let stdout = "café.py\0dir with space/a.py\0\"quoted\".py\0".as_bytes();
        assert_eq!(
            split_nul(stdout),
            vec!["café.py", "dir with space/a.py", "\"quoted\".py"]
        );
        assert!(split_nul(b"").is_empty());
    }
}
