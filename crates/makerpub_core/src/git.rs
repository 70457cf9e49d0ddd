//! Git operations on a working tree.
//!
//! Every command runs through a [`CommandRunner`] with the repository path
//! as its working directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use makerpub_runner::{CommandRunner, CommandSpec};
use tracing::{debug, info};

use crate::error::CoreResult;

/// Git operations manager.
#[derive(Clone)]
pub struct GitOps {
    repo_path: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl GitOps {
    pub fn new(repo_path: impl AsRef<Path>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
            runner,
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    fn git<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new("git").args(args).current_dir(&self.repo_path)
    }

    pub fn is_initialized(&self) -> bool {
        self.repo_path.join(".git").exists()
    }

    pub fn init(&self) -> CoreResult<()> {
        if self.is_initialized() {
            debug!("Repository already initialized at {}", self.repo_path.display());
            return Ok(());
        }
        info!("Initializing Git repository at {}", self.repo_path.display());
        self.runner.run_checked(&self.git(["init"]))?;
        Ok(())
    }

    /// Whether `git status --porcelain` reports anything.
    pub fn has_changes(&self) -> CoreResult<bool> {
        let output = self.runner.run_checked(&self.git(["status", "--porcelain"]))?;
        Ok(!output.stdout.trim().is_empty())
    }

    pub fn add(&self, paths: &[&str]) -> CoreResult<()> {
        let mut args = vec!["add"];
        args.extend(paths);
        self.runner.run_checked(&self.git(args))?;
        Ok(())
    }

    pub fn add_all(&self) -> CoreResult<()> {
        self.add(&["."])
    }

    pub fn commit(&self, message: &str) -> CoreResult<()> {
        self.runner.run_checked(&self.git(["commit", "-m", message]))?;
        info!("Committed in {}: {}", self.repo_path.display(), message);
        Ok(())
    }

    /// Stage everything and commit, if there is anything to commit.
    pub fn commit_all(&self, message: &str) -> CoreResult<bool> {
        if !self.has_changes()? {
            debug!("Nothing to commit in {}", self.repo_path.display());
            return Ok(false);
        }
        self.add_all()?;
        self.commit(message)?;
        Ok(true)
    }

    pub fn rename_branch(&self, branch: &str) -> CoreResult<()> {
        self.runner.run_checked(&self.git(["branch", "-M", branch]))?;
        Ok(())
    }

    pub fn push(&self, remote: &str, branch: &str, set_upstream: bool) -> CoreResult<()> {
        let mut args = vec!["push"];
        if set_upstream {
            args.push("-u");
        }
        args.extend([remote, branch]);
        self.runner.run_checked(&self.git(args))?;
        info!("Pushed {} to {}/{}", self.repo_path.display(), remote, branch);
        Ok(())
    }

    pub fn set_remote_url(&self, remote: &str, url: &str) -> CoreResult<()> {
        self.runner
            .run_checked(&self.git(["remote", "set-url", remote, url]))?;
        Ok(())
    }
}
