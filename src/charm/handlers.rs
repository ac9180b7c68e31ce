// ABOUTME: Guard conditions for the lifecycle handlers.
// ABOUTME: Pure predicates over UnitState and runtime availability, evaluated in a fixed order.

use super::state::UnitState;
use std::fmt;

/// Handlers the settle loop may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    StopContainer,
    ProvisionImage,
    StartContainer,
    ConfigureWebsite,
}

impl Handler {
    /// Evaluation order. Stop comes first so a pending stop always runs
    /// before anything can start the container.
    pub const ORDER: [Handler; 4] = [
        Handler::StopContainer,
        Handler::ProvisionImage,
        Handler::StartContainer,
        Handler::ConfigureWebsite,
    ];

    pub fn is_enabled(self, state: &UnitState, runtime_available: bool) -> bool {
        let lifecycle = state.lifecycle;
        match self {
            Handler::StopContainer => {
                state.stop_requested && runtime_available && !lifecycle.is_stopped()
            }
            Handler::ProvisionImage => runtime_available && !lifecycle.image_pulled(),
            Handler::StartContainer => {
                lifecycle.image_pulled()
                    && runtime_available
                    && !lifecycle.is_running()
                    && !state.stop_requested
            }
            Handler::ConfigureWebsite => lifecycle.is_running() && !state.relations.is_empty(),
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Handler::StopContainer => "stop-container",
            Handler::ProvisionImage => "provision-image",
            Handler::StartContainer => "start-container",
            Handler::ConfigureWebsite => "configure-website",
        })
    }
}
