// ABOUTME: Availability probe for container runtimes.
// ABOUTME: Answers whether the runtime daemon can serve requests right now.

use async_trait::async_trait;

#[async_trait]
pub trait RuntimeProbe: Send + Sync {
    /// Whether the runtime is installed and its daemon answers.
    async fn is_available(&self) -> bool;
}
