// ABOUTME: Capability traits for the container runtime seam.
// ABOUTME: ImageOps, ContainerOps and RuntimeProbe compose into FullRuntime.

mod container;
mod image;
mod runtime_info;
mod shared_types;

pub use container::{ContainerError, ContainerOps};
pub use image::{ImageError, ImageOps};
pub use runtime_info::RuntimeProbe;
pub use shared_types::*;

/// Everything the lifecycle controller needs from a runtime.
///
/// Implemented automatically for any type that provides all capabilities.
pub trait FullRuntime: ImageOps + ContainerOps + RuntimeProbe {}

impl<T: ImageOps + ContainerOps + RuntimeProbe> FullRuntime for T {}
