// ABOUTME: Runtime detection on the local machine.
// ABOUTME: Explicit configuration wins; otherwise Podman sockets are checked first, then Docker.

use super::types::{RuntimeInfo, RuntimeType};
use std::path::Path;

/// Error during runtime detection.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DetectionError {
    #[error("no container runtime found (checked Podman and Docker sockets)")]
    NoRuntimeFound,
}

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Pick the runtime to drive.
///
/// Detection order (when not explicitly configured):
/// 1. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 2. Rootful Podman socket (`/run/podman/podman.sock`)
/// 3. Docker socket (`/var/run/docker.sock`)
pub fn detect_local(explicit: Option<RuntimeType>) -> Result<RuntimeInfo, DetectionError> {
    if let Some(runtime_type) = explicit {
        return Ok(RuntimeInfo {
            runtime_type,
            socket_path: None,
        });
    }

    let mut candidates = Vec::with_capacity(3);
    if let Some(uid) = get_uid() {
        candidates.push((
            RuntimeType::Podman,
            format!("/run/user/{}/podman/podman.sock", uid),
        ));
    }
    candidates.push((RuntimeType::Podman, ROOTFUL_PODMAN.to_string()));
    candidates.push((RuntimeType::Docker, DOCKER_SOCKET.to_string()));

    candidates
        .into_iter()
        .find(|(_, socket)| Path::new(socket).exists())
        .map(|(runtime_type, socket)| RuntimeInfo {
            runtime_type,
            socket_path: Some(socket),
        })
        .ok_or(DetectionError::NoRuntimeFound)
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        // Fall back to reading /proc/self/status
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}
