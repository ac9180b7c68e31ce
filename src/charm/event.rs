// ABOUTME: Hook events delivered by the host framework.
// ABOUTME: Parses hook names such as config-changed or website-relation-joined.

use std::fmt;
use std::path::Path;

/// Relation over which the served port is published.
pub const RELATION_NAME: &str = "website";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    Install,
    ConfigChanged,
    Start,
    UpgradeCharm,
    UpdateStatus,
    /// Unit teardown.
    Stop,
    /// A `website` relation joined or its remote settings changed.
    RelationJoined { relation_id: String },
    /// A `website` relation departed or was broken.
    RelationDeparted { relation_id: String },
    /// Any other hook. Only settles the handlers.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("hook {0} requires a relation id")]
    MissingRelationId(String),
}

impl HookEvent {
    /// Parse a hook name. Paths like `hooks/install` are accepted; `website`
    /// relation hooks need the relation id the host passes alongside. Hooks
    /// this unit has no handling for parse as [`HookEvent::Other`].
    pub fn parse(name: &str, relation_id: Option<&str>) -> Result<Self, EventError> {
        let name = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);

        let event = match name {
            "install" => HookEvent::Install,
            "config-changed" => HookEvent::ConfigChanged,
            "start" => HookEvent::Start,
            "upgrade-charm" => HookEvent::UpgradeCharm,
            "update-status" => HookEvent::UpdateStatus,
            "stop" => HookEvent::Stop,
            _ => return Self::parse_relation(name, relation_id),
        };
        Ok(event)
    }

    fn parse_relation(name: &str, relation_id: Option<&str>) -> Result<Self, EventError> {
        let suffix = name
            .strip_prefix(RELATION_NAME)
            .and_then(|rest| rest.strip_prefix("-relation-"));

        let joined = match suffix {
            Some("joined" | "changed") => true,
            Some("departed" | "broken") => false,
            _ => return Ok(HookEvent::Other(name.to_string())),
        };

        let relation_id = relation_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| EventError::MissingRelationId(name.to_string()))?
            .to_string();

        Ok(if joined {
            HookEvent::RelationJoined { relation_id }
        } else {
            HookEvent::RelationDeparted { relation_id }
        })
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookEvent::Install => f.write_str("install"),
            HookEvent::ConfigChanged => f.write_str("config-changed"),
            HookEvent::Start => f.write_str("start"),
            HookEvent::UpgradeCharm => f.write_str("upgrade-charm"),
            HookEvent::UpdateStatus => f.write_str("update-status"),
            HookEvent::Stop => f.write_str("stop"),
            HookEvent::RelationJoined { relation_id } => {
                write!(f, "{}-relation-joined ({})", RELATION_NAME, relation_id)
            }
            HookEvent::RelationDeparted { relation_id } => {
                write!(f, "{}-relation-departed ({})", RELATION_NAME, relation_id)
            }
            HookEvent::Other(name) => f.write_str(name),
        }
    }
}
