// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: RunSpec and its port and volume parts, rendered as CLI arguments.

use crate::types::{ContainerName, ImageRef, Port};
use std::fmt;
use std::path::PathBuf;

/// Internal port nginx listens on inside the container.
pub const CONTAINER_HTTP_PORT: u16 = 80;

/// Path nginx serves static content from inside the container.
pub const CONTAINER_CONTENT_PATH: &str = "/usr/share/nginx/html";

/// Restart policy passed to `run --restart`.
const RESTART_POLICY: &str = "on-failure";

/// Everything needed to `run` a detached container. The runtime restarts it
/// when it exits with an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub name: ContainerName,
    pub image: ImageRef,
    pub volumes: Vec<VolumeMount>,
    pub ports: Vec<PortMapping>,
}

impl RunSpec {
    /// Spec for the nginx container: content mounted read-only, host port
    /// mapped onto the internal HTTP port.
    pub fn nginx(name: ContainerName, image: ImageRef, content: PathBuf, port: Port) -> Self {
        Self {
            name,
            image,
            volumes: vec![VolumeMount {
                source: content,
                target: CONTAINER_CONTENT_PATH.to_string(),
                read_only: true,
            }],
            ports: vec![PortMapping {
                host_port: port,
                container_port: CONTAINER_HTTP_PORT,
            }],
        }
    }

    /// Arguments following the runtime binary, in `run` order.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--restart".to_string(),
            RESTART_POLICY.to_string(),
            "--name".to_string(),
            self.name.to_string(),
        ];
        for volume in &self.volumes {
            args.push("-v".to_string());
            args.push(volume.to_string());
        }
        for port in &self.ports {
            args.push("-p".to_string());
            args.push(port.to_string());
        }
        args.push("-d".to_string());
        args.push(self.image.to_string());
        args
    }
}

/// Host to container port mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    pub host_port: Port,
    pub container_port: u16,
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host_port, self.container_port)
    }
}

/// Bind mount of a host directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    pub source: PathBuf,
    pub target: String,
    pub read_only: bool,
}

impl fmt::Display for VolumeMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source.display(), self.target)?;
        if self.read_only {
            f.write_str(":ro")?;
        }
        Ok(())
    }
}
