use anyhow::{Context, Result};
use git2::Repository;
use std::path::{Path, PathBuf};

/// Repository handle used for discovery and hook file management
pub struct GitOperations {
    repo: Repository,
}

impl GitOperations {
    /// Open a Git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open Git repository")?;

        Ok(Self { repo })
    }

    /// Discover the repository containing `start`
    pub fn discover<P: AsRef<Path>>(start: P) -> Result<Self> {
        let repo = Repository::discover(start).context("No Git repository found")?;

        Ok(Self { repo })
    }

    /// Working tree root. Bare repositories have none and cannot run pre-commit checks.
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory")
    }

    /// Directory git looks in for hooks, honouring `core.hooksPath`
    pub fn hooks_dir(&self) -> Result<PathBuf> {
        let config = self
            .repo
            .config()
            .context("Failed to read repository config")?;

        match config.get_path("core.hooksPath") {
            Ok(path) if path.is_absolute() => Ok(path),
            Ok(path) => Ok(self.workdir()?.join(path)),
            Err(_) => Ok(self.repo.path().join("hooks")),
        }
    }

    pub fn hook_path(&self, hook_name: &str) -> Result<PathBuf> {
        Ok(self.hooks_dir()?.join(hook_name))
    }

    /// Write a hook script. An existing hook is only replaced when `force` is set.
    pub fn install_hook(
        &self,
        hook_name: &str,
        hook_content: &str,
        force: bool,
    ) -> Result<PathBuf> {
        let hooks_dir = self.hooks_dir()?;
        let hook_path = hooks_dir.join(hook_name);

        if hook_path.exists() && !force {
            anyhow::bail!("hook already exists ({})", hook_path.display());
        }

        std::fs::create_dir_all(&hooks_dir).context("Failed to create hooks directory")?;
        std::fs::write(&hook_path, hook_content).context("Failed to write hook file")?;

        // rwxr--r--
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&hook_path)
                .context("Failed to get hook file metadata")?
                .permissions();
            perms.set_mode(0o744);
            std::fs::set_permissions(&hook_path, perms)
                .context("Failed to set hook file permissions")?;
        }

        Ok(hook_path)
    }

    /// Remove a hook if its content carries `marker`. Returns whether a file was removed.
    pub fn remove_hook(&self, hook_name: &str, marker: &str) -> Result<bool> {
        let hook_path = self.hook_path(hook_name)?;

        if !hook_path.exists() {
            return Ok(false);
        }

        let content = std::fs::read_to_string(&hook_path)
            .with_context(|| format!("Failed to read hook file: {}", hook_path.display()))?;
        if !content.contains(marker) {
            anyhow::bail!(
                "{} was not installed by precog, leaving it in place",
                hook_path.display()
            );
        }

        std::fs::remove_file(&hook_path).context("Failed to remove hook file")?;
        Ok(true)
    }
}
