// ABOUTME: Container name validation following the runtime's naming rules.
// ABOUTME: Names start with an alphanumeric and continue with [a-zA-Z0-9_.-].

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerNameError {
    #[error("container name cannot be empty")]
    Empty,

    #[error("container name must start with a letter or digit")]
    BadFirstChar,

    #[error("invalid character in container name: '{0}'")]
    InvalidChar(char),
}

/// Name of the single container managed by this unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerName(String);

impl ContainerName {
    pub fn new(value: &str) -> Result<Self, ContainerNameError> {
        let mut chars = value.chars();
        let first = chars.next().ok_or(ContainerNameError::Empty)?;

        if !first.is_ascii_alphanumeric() {
            return Err(ContainerNameError::BadFirstChar);
        }

        if let Some(c) = chars.find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '_' | '.' | '-'))
        {
            return Err(ContainerNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContainerName {
    /// The fixed name of the nginx container; only one may exist per host.
    fn default() -> Self {
        Self("docker-nginx".to_string())
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
