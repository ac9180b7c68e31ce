// ABOUTME: Change tracking between the current options and the last applied ones.
// ABOUTME: A key counts as changed when it differs or when nothing was applied before.

use super::CharmConfig;
use std::fmt;

/// Option keys that handlers react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Port,
    Webroot,
    Repository,
    Branch,
    Runtime,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::Port,
        ConfigKey::Webroot,
        ConfigKey::Repository,
        ConfigKey::Branch,
        ConfigKey::Runtime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Port => "port",
            ConfigKey::Webroot => "webroot",
            ConfigKey::Repository => "repository",
            ConfigKey::Branch => "branch",
            ConfigKey::Runtime => "runtime",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current options paired with the options of the previous successful invocation.
#[derive(Debug, Clone)]
pub struct ConfigView {
    current: CharmConfig,
    previous: Option<CharmConfig>,
}

impl ConfigView {
    pub fn new(current: CharmConfig, previous: Option<CharmConfig>) -> Self {
        Self { current, previous }
    }

    pub fn current(&self) -> &CharmConfig {
        &self.current
    }

    pub fn previous(&self) -> Option<&CharmConfig> {
        self.previous.as_ref()
    }

    pub fn changed(&self, key: ConfigKey) -> bool {
        let Some(previous) = &self.previous else {
            return true;
        };
        let current = &self.current;
        match key {
            ConfigKey::Port => current.port != previous.port,
            ConfigKey::Webroot => current.webroot != previous.webroot,
            ConfigKey::Repository => current.repository != previous.repository,
            ConfigKey::Branch => current.branch != previous.branch,
            ConfigKey::Runtime => current.runtime != previous.runtime,
        }
    }

    pub fn changed_keys(&self) -> Vec<ConfigKey> {
        ConfigKey::ALL
            .into_iter()
            .filter(|key| self.changed(*key))
            .collect()
    }
}
