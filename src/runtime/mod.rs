// ABOUTME: Container runtime seam: capability traits, detection and the CLI-backed runtime.
// ABOUTME: The controller only sees the traits; CliRuntime shells out to docker or podman.

mod cli;
mod detection;
pub mod traits;
mod types;

pub use cli::CliRuntime;
pub use detection::{DetectionError, detect_local};
pub use traits::{
    CONTAINER_CONTENT_PATH, CONTAINER_HTTP_PORT, ContainerError, ContainerOps, FullRuntime,
    ImageError, ImageOps, PortMapping, RunSpec, RuntimeProbe, VolumeMount,
};
pub use types::{RuntimeInfo, RuntimeType};
