//! Git subprocess runner.
//!
//! Runs `git --no-pager -c color.ui=false <args>` with piped output and a
//! bounded timeout. Stdout and stderr are captured in full so a failing
//! step can be diagnosed from the error alone.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time;

use crate::VersionControl;

const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// A commit identity applied with `git config user.name` / `user.email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("git not found in PATH")]
    BinaryNotFound(#[source] which::Error),
    #[error("refusing ref that looks like a flag: {reference}")]
    InvalidRef { reference: String },
    #[error("failed to spawn git {subcommand}: {source}")]
    Spawn {
        subcommand: String,
        #[source]
        source: std::io::Error,
    },
    #[error("git {subcommand} timed out after {timeout:?}")]
    Timeout {
        subcommand: String,
        timeout: Duration,
    },
    #[error("git {subcommand} exited with {code:?}: {stderr}")]
    Failed {
        subcommand: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Reject refs and remotes that could be parsed as flags.
pub(crate) fn validate_ref(reference: &str) -> Result<(), GitError> {
    if reference.trim().is_empty() || reference.starts_with('-') {
        return Err(GitError::InvalidRef {
            reference: reference.to_string(),
        });
    }
    Ok(())
}

pub struct GitRunner {
    git_bin: PathBuf,
    working_dir: PathBuf,
    timeout: Duration,
}

impl GitRunner {
    /// Locate the git binary and bind the runner to `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>) -> Result<Self, GitError> {
        let bare_name = if cfg!(windows) { "git.exe" } else { "git" };
        let git_bin = which::which(bare_name).map_err(GitError::BinaryNotFound)?;
        Ok(Self {
            git_bin,
            working_dir: working_dir.into(),
            timeout: DEFAULT_GIT_TIMEOUT,
        })
    }

    async fn run(&self, subcommand_args: Vec<String>) -> Result<String, GitError> {
        let subcommand = subcommand_args
            .first()
            .cloned()
            .unwrap_or_else(|| "<none>".to_string());

        let mut args: Vec<String> = vec!["--no-pager".into(), "-c".into(), "color.ui=false".into()];
        args.extend(subcommand_args);

        let mut cmd = Command::new(&self.git_bin);
        cmd.args(&args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| GitError::Spawn {
            subcommand: subcommand.clone(),
            source,
        })?;

        let output = time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| GitError::Timeout {
                subcommand: subcommand.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| GitError::Spawn {
                subcommand: subcommand.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(GitError::Failed {
                subcommand,
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        tracing::debug!(
            subcommand = %subcommand,
            stdout = %stdout.trim(),
            stderr = %stderr.trim(),
            "git command succeeded"
        );
        Ok(stdout)
    }
}

impl VersionControl for GitRunner {
    async fn configure_identity(&self, author: &Author) -> Result<(), GitError> {
        self.run(vec![
            "config".into(),
            "user.name".into(),
            author.name.clone(),
        ])
        .await?;
        self.run(vec![
            "config".into(),
            "user.email".into(),
            author.email.clone(),
        ])
        .await?;
        Ok(())
    }

    async fn stage_and_commit(&self, path: &Path, message: &str) -> Result<(), GitError> {
        self.run(vec![
            "add".into(),
            "--".into(),
            path.display().to_string(),
        ])
        .await?;
        self.run(vec!["commit".into(), "-m".into(), message.to_string()])
            .await?;
        Ok(())
    }

    async fn push(&self, branch: &str) -> Result<(), GitError> {
        validate_ref(branch)?;
        self.run(vec![
            "push".into(),
            "origin".into(),
            format!("HEAD:{branch}"),
        ])
        .await?;
        Ok(())
    }
}
