// ABOUTME: Host port number restricted to 1..=65535.
// ABOUTME: Deserializes from integers and rejects out-of-range values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroU16;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("port must be between 1 and 65535, got {0}")]
pub struct PortError(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Port(NonZeroU16);

impl Port {
    pub const HTTP: Port = Port(NonZeroU16::MIN.saturating_add(79));

    pub fn new(value: i64) -> Result<Self, PortError> {
        u16::try_from(value)
            .ok()
            .and_then(NonZeroU16::new)
            .map(Port)
            .ok_or(PortError(value))
    }

    pub fn get(self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Port {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.get())
    }
}

impl<'de> Deserialize<'de> for Port {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Port::new(value).map_err(serde::de::Error::custom)
    }
}
