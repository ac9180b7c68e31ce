// ABOUTME: UnitHost implementation that shells out to hook tools.
// ABOUTME: status-set, open-port, close-port, relation-set and config-get.

use super::{HostError, UnitHost, WorkloadStatus};
use crate::types::Port;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Runs hook tools found on `PATH`, or in a fixed directory when configured.
#[derive(Debug, Clone, Default)]
pub struct HookTools {
    tools_dir: Option<PathBuf>,
}

impl HookTools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve tools inside `dir` instead of `PATH`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            tools_dir: Some(dir.to_path_buf()),
        }
    }

    fn tool_path(&self, tool: &str) -> PathBuf {
        match &self.tools_dir {
            Some(dir) => dir.join(tool),
            None => PathBuf::from(tool),
        }
    }

    /// Run a tool and return its stdout.
    async fn run(&self, tool: &str, args: &[String]) -> Result<String, HostError> {
        tracing::debug!("{} {}", tool, args.join(" "));

        let output = Command::new(self.tool_path(tool))
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| HostError::Spawn {
                tool: tool.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(HostError::Failed {
                tool: tool.to_string(),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Current charm options as JSON.
    pub async fn config_get(&self) -> Result<String, HostError> {
        self.run("config-get", &["--format=json".to_string()]).await
    }
}

#[async_trait]
impl UnitHost for HookTools {
    async fn set_status(&self, status: WorkloadStatus, message: &str) -> Result<(), HostError> {
        self.run("status-set", &[status.to_string(), message.to_string()])
            .await
            .map(drop)
    }

    async fn open_port(&self, port: Port) -> Result<(), HostError> {
        self.run("open-port", &[format!("{}/tcp", port)])
            .await
            .map(drop)
    }

    async fn close_port(&self, port: Port) -> Result<(), HostError> {
        self.run("close-port", &[format!("{}/tcp", port)])
            .await
            .map(drop)
    }

    async fn relation_set(
        &self,
        relation_id: &str,
        settings: &[(&str, String)],
    ) -> Result<(), HostError> {
        let mut args = vec!["-r".to_string(), relation_id.to_string()];
        args.extend(
            settings
                .iter()
                .map(|(key, value)| format!("{}={}", key, value)),
        );
        self.run("relation-set", &args).await.map(drop)
    }
}
