// ABOUTME: Lifecycle state of the managed container and the durable unit state around it.
// ABOUTME: Uninstalled -> ImagePulled -> Running <-> Stopped, plus a transient stop request.

use crate::types::Port;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Store key holding the serialized [`UnitState`].
pub const STATE_KEY: &str = "nginx.state";

/// Store key holding the last [`ContentRecord`].
pub const CONTENT_KEY: &str = "nginx.content";

/// Store key holding the options applied by the last successful hook.
pub const CONFIG_KEY: &str = "charm.config";

/// Where the container is in its lifecycle.
///
/// Available actions per state:
/// - `Uninstalled`: pull the image
/// - `ImagePulled`: start, stop
/// - `Running`: stop
/// - `Stopped`: start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleState {
    #[default]
    Uninstalled,
    ImagePulled,
    Running,
    Stopped,
}

impl LifecycleState {
    /// The image is present locally in every state past `Uninstalled`.
    pub fn image_pulled(self) -> bool {
        self != LifecycleState::Uninstalled
    }

    pub fn is_running(self) -> bool {
        self == LifecycleState::Running
    }

    pub fn is_stopped(self) -> bool {
        self == LifecycleState::Stopped
    }

    /// Whether a container named after this unit may exist.
    pub fn may_have_container(self) -> bool {
        matches!(self, LifecycleState::ImagePulled | LifecycleState::Running)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LifecycleState::Uninstalled => "uninstalled",
            LifecycleState::ImagePulled => "image-pulled",
            LifecycleState::Running => "running",
            LifecycleState::Stopped => "stopped",
        })
    }
}

/// Everything about the unit that must survive between hook invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UnitState {
    pub lifecycle: LifecycleState,
    /// Pending stop; cleared by the stop handler.
    pub stop_requested: bool,
    /// Port opened at the host level by the last start.
    pub opened_port: Option<Port>,
    /// Joined `website` relation ids.
    pub relations: BTreeSet<String>,
}

/// Last repository checkout served by the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContentRecord {
    pub dir: PathBuf,
    pub repository: String,
    pub branch: String,
    pub fetched_at: DateTime<Utc>,
}

impl ContentRecord {
    pub fn new(dir: PathBuf, repository: &str, branch: &str) -> Self {
        Self {
            dir,
            repository: repository.to_string(),
            branch: branch.to_string(),
            fetched_at: Utc::now(),
        }
    }

    /// Whether this checkout was made from `repository`@`branch`.
    pub fn matches(&self, repository: &str, branch: &str) -> bool {
        self.repository == repository && self.branch == branch
    }
}
