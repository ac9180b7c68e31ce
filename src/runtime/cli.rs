// ABOUTME: Runtime implementation that drives the docker or podman CLI.
// ABOUTME: Each operation is one blocking child process; stderr becomes the error message.

use super::traits::{ContainerError, ContainerOps, ImageError, ImageOps, RunSpec, RuntimeProbe};
use super::types::RuntimeType;
use crate::types::{ContainerName, ImageRef};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of one runtime command.
#[derive(Debug)]
struct CommandOutput {
    exit_code: Option<i32>,
    stderr: String,
}

impl CommandOutput {
    fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    fn message(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("exit code {:?}", self.exit_code)
        } else {
            stderr.to_string()
        }
    }
}

/// Container runtime reached through its command-line client.
#[derive(Debug, Clone)]
pub struct CliRuntime {
    runtime_type: RuntimeType,
    binary: PathBuf,
}

impl CliRuntime {
    pub fn new(runtime_type: RuntimeType) -> Self {
        Self {
            runtime_type,
            binary: PathBuf::from(runtime_type.binary()),
        }
    }

    /// Use a specific client binary instead of looking it up on `PATH`.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn exec<S: AsRef<str>>(&self, args: &[S]) -> std::io::Result<CommandOutput> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        tracing::debug!("{} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    async fn container_command(
        &self,
        operation: &'static str,
        name: &ContainerName,
    ) -> Result<(), ContainerError> {
        let output = self
            .exec(&[operation, name.as_str()])
            .await
            .map_err(|e| ContainerError::Runtime(e.to_string()))?;

        if output.success() {
            return Ok(());
        }

        let message = output.message();
        if message.contains("No such container") || message.contains("no such container") {
            return Err(ContainerError::NotFound(name.to_string()));
        }
        Err(ContainerError::CommandFailed {
            operation,
            name: name.to_string(),
            message,
        })
    }
}

#[async_trait]
impl ImageOps for CliRuntime {
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        let image = reference.to_string();
        let output = self
            .exec(&["pull", image.as_str()])
            .await
            .map_err(|e| ImageError::Runtime(e.to_string()))?;

        if output.success() {
            Ok(())
        } else {
            Err(ImageError::PullFailed {
                image,
                message: output.message(),
            })
        }
    }
}

#[async_trait]
impl ContainerOps for CliRuntime {
    async fn run_container(&self, spec: &RunSpec) -> Result<(), ContainerError> {
        let output = self
            .exec(&spec.to_args())
            .await
            .map_err(|e| ContainerError::Runtime(e.to_string()))?;

        if output.success() {
            return Ok(());
        }

        let message = output.message();
        if message.contains("is already in use") {
            return Err(ContainerError::AlreadyExists(spec.name.to_string()));
        }
        Err(ContainerError::CommandFailed {
            operation: "run",
            name: spec.name.to_string(),
            message,
        })
    }

    async fn kill_container(&self, name: &ContainerName) -> Result<(), ContainerError> {
        self.container_command("kill", name).await
    }

    async fn remove_container(&self, name: &ContainerName) -> Result<(), ContainerError> {
        self.container_command("rm", name).await
    }
}

#[async_trait]
impl RuntimeProbe for CliRuntime {
    async fn is_available(&self) -> bool {
        match self.exec(&["info"]).await {
            Ok(output) if output.success() => true,
            Ok(output) => {
                tracing::debug!("{} info failed: {}", self.runtime_type, output.message());
                false
            }
            Err(e) => {
                tracing::debug!("{} not runnable: {}", self.binary.display(), e);
                false
            }
        }
    }
}
