// ABOUTME: Error types for lifecycle handlers.
// ABOUTME: Every variant is fatal to the hook; swallowed failures go to Diagnostics instead.

use super::transitions::TransitionError;
use crate::fetch::FetchError;
use crate::host::HostError;
use crate::runtime::{ContainerError, ImageError};
use crate::store::StoreError;
use std::path::PathBuf;

/// Errors that abort a hook invocation.
#[derive(Debug, thiserror::Error)]
pub enum CharmError {
    /// Image pull failed.
    #[error("failed to pull image: {0}")]
    ImagePullFailed(String),

    /// Container run failed.
    #[error("failed to start container: {0}")]
    ContainerStartFailed(String),

    /// The webroot or its default assets could not be written.
    #[error("failed to prepare webroot {}: {source}", path.display())]
    WebrootFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Website content could not be fetched.
    #[error("failed to fetch website content: {0}")]
    FetchFailed(#[from] FetchError),

    /// A hook tool failed.
    #[error("hook tool failed: {0}")]
    Host(#[from] HostError),

    /// Unit state could not be read or written.
    #[error("unit state: {0}")]
    Store(#[from] StoreError),

    /// Lifecycle transition not allowed from the current state.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl From<ImageError> for CharmError {
    fn from(err: ImageError) -> Self {
        CharmError::ImagePullFailed(err.to_string())
    }
}

impl From<ContainerError> for CharmError {
    fn from(err: ContainerError) -> Self {
        CharmError::ContainerStartFailed(err.to_string())
    }
}
