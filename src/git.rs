//! # Git Operations
//!
//! Repository creation needs five `git` invocations: clone the template,
//! stage everything, commit, point `origin` at the new remote and force-push.
//! They sit behind the [`GitOperations`] trait so sessions can be tested with
//! a mock. [`SystemGit`] runs the system `git` binary, which picks up SSH
//! keys, credential helpers and `~/.gitconfig` on its own.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    /// Clone `source` into `destination`, replacing whatever is there.
    fn clone_repo(&self, source: &str, destination: &Path) -> Result<()>;

    /// Stage every change in the working tree, including deletions.
    fn stage_all(&self, repo: &Path) -> Result<()>;

    fn commit(&self, repo: &Path, message: &str) -> Result<()>;

    /// Point `origin` at `url`.
    fn set_remote(&self, repo: &Path, url: &str) -> Result<()>;

    /// Force-push `branch` to `origin` and track it.
    fn force_push(&self, repo: &Path, branch: &str) -> Result<()>;
}

/// [`GitOperations`] backed by the `git` executable.
#[derive(Debug, Clone, Default)]
pub struct SystemGit {
    identity: Option<(String, String)>,
}

impl SystemGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit as the given author instead of the configured user.
    pub fn with_identity(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            identity: Some((name.into(), email.into())),
        }
    }

    fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let mut command = Command::new("git");
        if let Some((name, email)) = &self.identity {
            command
                .arg("-c")
                .arg(format!("user.name={}", name))
                .arg("-c")
                .arg(format!("user.email={}", email));
        }
        command.args(args).current_dir(dir);

        let display = args.join(" ");
        log::debug!("Running git {} in {}", display, dir.display());

        let output = command.output().map_err(|e| Error::GitCommand {
            command: display.clone(),
            dir: dir.display().to_string(),
            stderr: e.to_string(),
        })?;

        if !output.status.success() {
            return Err(Error::GitCommand {
                command: display,
                dir: dir.display().to_string(),
                stderr: explain_failure(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitOperations for SystemGit {
    fn clone_repo(&self, source: &str, destination: &Path) -> Result<()> {
        // git won't clone into an existing non-empty directory
        if destination.exists() {
            fs::remove_dir_all(destination)?;
        }

        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let name = destination
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Path {
                message: format!("Invalid clone destination: {}", destination.display()),
            })?;
        self.run(parent, &["clone", source, name])?;
        Ok(())
    }

    fn stage_all(&self, repo: &Path) -> Result<()> {
        self.run(repo, &["add", "-A"])?;
        Ok(())
    }

    fn commit(&self, repo: &Path, message: &str) -> Result<()> {
        self.run(repo, &["commit", "-m", message])?;
        Ok(())
    }

    fn set_remote(&self, repo: &Path, url: &str) -> Result<()> {
        self.run(repo, &["remote", "set-url", "origin", url])?;
        Ok(())
    }

    fn force_push(&self, repo: &Path, branch: &str) -> Result<()> {
        self.run(repo, &["push", "-u", "origin", branch, "-f"])?;
        Ok(())
    }
}

/// Add a hint to stderr output of common authentication failures.
fn explain_failure(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
    {
        format!(
            "{}\nMake sure you have access to the repository: an SSH key in ssh-agent, \
             configured git credentials or a personal access token.",
            stderr
        )
    } else {
        stderr.to_string()
    }
}
