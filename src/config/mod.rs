// ABOUTME: Charm configuration: the option bag handed to every hook invocation.
// ABOUTME: Parses YAML files or config-get JSON, applies defaults and validates values.

mod changes;
mod deserialize;

pub use changes::{ConfigKey, ConfigView};

use crate::runtime::RuntimeType;
use crate::types::Port;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_WEBROOT: &str = "/srv/docker-nginx";
pub const DEFAULT_BRANCH: &str = "master";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Charm options as seen by one hook invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CharmConfig {
    #[serde(default = "default_port")]
    pub port: Port,

    #[serde(default = "default_webroot")]
    pub webroot: PathBuf,

    #[serde(default, deserialize_with = "deserialize::empty_as_none")]
    pub repository: Option<String>,

    #[serde(default = "default_branch")]
    pub branch: String,

    /// Explicit runtime; detected from local sockets when absent.
    #[serde(default)]
    pub runtime: Option<RuntimeType>,
}

fn default_port() -> Port {
    Port::HTTP
}

fn default_webroot() -> PathBuf {
    PathBuf::from(DEFAULT_WEBROOT)
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

impl Default for CharmConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            webroot: default_webroot(),
            repository: None,
            branch: default_branch(),
            runtime: None,
        }
    }
}

impl CharmConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse the output of `config-get --format=json`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.webroot.is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "webroot must be an absolute path, got {}",
                self.webroot.display()
            )));
        }

        if self.branch.trim().is_empty() {
            return Err(ConfigError::Invalid("branch cannot be empty".to_string()));
        }

        // Both end up as git arguments
        if self.branch.starts_with('-') {
            return Err(ConfigError::Invalid(format!(
                "branch cannot start with '-', got {}",
                self.branch
            )));
        }
        if let Some(repository) = &self.repository
            && repository.starts_with('-')
        {
            return Err(ConfigError::Invalid(format!(
                "repository cannot start with '-', got {}",
                repository
            )));
        }

        Ok(())
    }
}
