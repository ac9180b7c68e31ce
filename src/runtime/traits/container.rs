// ABOUTME: Container operations trait for container runtimes.
// ABOUTME: Run a detached container by spec, kill and remove it by name.

use super::shared_types::RunSpec;
use crate::types::ContainerName;
use async_trait::async_trait;

/// Container lifecycle operations addressed by container name.
#[async_trait]
pub trait ContainerOps: Send + Sync {
    /// Create and start a detached container.
    async fn run_container(&self, spec: &RunSpec) -> Result<(), ContainerError>;

    /// Forcibly terminate a running container.
    async fn kill_container(&self, name: &ContainerName) -> Result<(), ContainerError>;

    /// Remove a (stopped) container.
    async fn remove_container(&self, name: &ContainerName) -> Result<(), ContainerError>;
}

/// Errors from container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("container already exists: {0}")]
    AlreadyExists(String),

    #[error("{operation} {name} failed: {message}")]
    CommandFailed {
        operation: &'static str,
        name: String,
        message: String,
    },

    #[error("runtime error: {0}")]
    Runtime(String),
}
