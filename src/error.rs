// ABOUTME: Application-wide error type for docker-nginx.
// ABOUTME: Wraps the per-layer errors so main can report any of them uniformly.

use crate::charm::{CharmError, EventError};
use crate::config::ConfigError;
use crate::host::HostError;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no hook name given (pass one or set JUJU_HOOK_NAME)")]
    MissingHook,

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("reading charm options: {0}")]
    Host(#[from] HostError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Charm(#[from] CharmError),
}

pub type Result<T> = std::result::Result<T, Error>;
