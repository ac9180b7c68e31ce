// ABOUTME: Seam to the orchestration host: status, port exposure and relation data.
// ABOUTME: HookTools implements it by running the host's hook tool executables.

mod status;
mod tools;

pub use status::WorkloadStatus;
pub use tools::HookTools;

use crate::types::Port;
use async_trait::async_trait;

/// Operations the unit performs against its host framework.
#[async_trait]
pub trait UnitHost: Send + Sync {
    /// Report the workload status shown to operators.
    async fn set_status(&self, status: WorkloadStatus, message: &str) -> Result<(), HostError>;

    /// Expose a TCP port at the host/firewall level.
    async fn open_port(&self, port: Port) -> Result<(), HostError>;

    /// Withdraw a previously exposed TCP port.
    async fn close_port(&self, port: Port) -> Result<(), HostError>;

    /// Publish key/value settings on a relation.
    async fn relation_set(
        &self,
        relation_id: &str,
        settings: &[(&str, String)],
    ) -> Result<(), HostError>;
}

/// Errors from hook tool invocations.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },

    #[error("{tool} exited with code {exit_code:?}: {stderr}")]
    Failed {
        tool: String,
        exit_code: Option<i32>,
        stderr: String,
    },
}
