// ABOUTME: Image operations trait for container runtimes.
// ABOUTME: Pulls the served image by reference.

use crate::types::ImageRef;
use async_trait::async_trait;

/// Image operations.
#[async_trait]
pub trait ImageOps: Send + Sync {
    /// Pull an image from its registry. Blocks until the pull finishes.
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("pull of {image} failed: {message}")]
    PullFailed { image: String, message: String },

    #[error("runtime error: {0}")]
    Runtime(String),
}
