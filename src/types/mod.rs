// ABOUTME: Validated domain types shared by the controller and its collaborators.
// ABOUTME: Container names, image references and host ports.

mod container_name;
mod image_ref;
mod port;

pub use container_name::{ContainerName, ContainerNameError};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use port::{Port, PortError};
