// ABOUTME: Source-control fetch of website content into the webroot.
// ABOUTME: GitFetcher clones a branch shallowly, or refreshes an existing checkout in place.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("cannot derive a checkout directory from repository {0:?}")]
    InvalidRepository(String),

    #[error("invalid branch name {0:?}")]
    InvalidBranch(String),

    #[error("failed to prepare {}: {source}", path.display())]
    Prepare {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to run git: {0}")]
    Spawn(std::io::Error),

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },
}

/// Fetches a repository branch below a webroot.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Make `<webroot>/<repository name>` hold `branch` of `repository`.
    /// Returns the checkout directory.
    async fn fetch(
        &self,
        repository: &str,
        branch: &str,
        webroot: &Path,
    ) -> Result<PathBuf, FetchError>;
}

/// Checkout directory for `repository` below `webroot`: the last path
/// segment of the URL without a `.git` suffix.
pub fn checkout_dir(webroot: &Path, repository: &str) -> Result<PathBuf, FetchError> {
    let trimmed = repository.trim().trim_end_matches('/');
    let last = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or_default();
    let name = last.strip_suffix(".git").unwrap_or(last);

    if name.is_empty() || name == "." || name == ".." {
        return Err(FetchError::InvalidRepository(repository.to_string()));
    }

    Ok(webroot.join(name))
}

/// Fetcher backed by the `git` CLI.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    binary: PathBuf,
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("git"),
        }
    }
}

impl GitFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn git(&self, args: &[&str]) -> Result<(), FetchError> {
        tracing::debug!("git {}", args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(FetchError::Spawn)?;

        if output.status.success() {
            Ok(())
        } else {
            let command = match args {
                ["-C", _, command, ..] | [command, ..] => *command,
                [] => "",
            };
            Err(FetchError::Git {
                command: command.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl ContentFetcher for GitFetcher {
    async fn fetch(
        &self,
        repository: &str,
        branch: &str,
        webroot: &Path,
    ) -> Result<PathBuf, FetchError> {
        if branch.is_empty() || branch.starts_with('-') {
            return Err(FetchError::InvalidBranch(branch.to_string()));
        }
        if repository.starts_with('-') {
            return Err(FetchError::InvalidRepository(repository.to_string()));
        }

        let dest = checkout_dir(webroot, repository)?;
        let dest_str = dest.to_string_lossy().to_string();

        if dest.join(".git").is_dir() {
            tracing::info!("Refreshing {} from {} ({})", dest.display(), repository, branch);
            self.git(&[
                "-C", &dest_str, "fetch", "--depth", "1", "--", repository, branch,
            ])
            .await?;
            self.git(&["-C", &dest_str, "reset", "--hard", "FETCH_HEAD"])
                .await?;
            return Ok(dest);
        }

        std::fs::create_dir_all(webroot).map_err(|source| FetchError::Prepare {
            path: webroot.to_path_buf(),
            source,
        })?;

        tracing::info!("Cloning {} ({}) into {}", repository, branch, dest.display());
        self.git(&[
            "clone", "--depth", "1", "--branch", branch, "--", repository, &dest_str,
        ])
        .await?;

        Ok(dest)
    }
}
