// ABOUTME: State transition methods for the container lifecycle.
// ABOUTME: Each method checks the source state and moves UnitState to the next one.

use super::state::{LifecycleState, UnitState};
use crate::types::Port;

/// A transition attempted from a state that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {action} while {from}")]
    Invalid {
        from: LifecycleState,
        action: &'static str,
    },

    #[error("cannot start the container while a stop is pending")]
    StopPending,
}

impl UnitState {
    fn invalid(&self, action: &'static str) -> TransitionError {
        TransitionError::Invalid {
            from: self.lifecycle,
            action,
        }
    }

    // =========================================================================
    // Uninstalled -> ImagePulled
    // =========================================================================

    pub fn record_image_pulled(&mut self) -> Result<(), TransitionError> {
        match self.lifecycle {
            LifecycleState::Uninstalled => {
                self.lifecycle = LifecycleState::ImagePulled;
                Ok(())
            }
            _ => Err(self.invalid("mark the image pulled")),
        }
    }

    // =========================================================================
    // ImagePulled | Stopped -> Running
    // =========================================================================

    pub fn record_started(&mut self, port: Port) -> Result<(), TransitionError> {
        if self.stop_requested {
            return Err(TransitionError::StopPending);
        }
        match self.lifecycle {
            LifecycleState::ImagePulled | LifecycleState::Stopped => {
                self.lifecycle = LifecycleState::Running;
                self.opened_port = Some(port);
                Ok(())
            }
            _ => Err(self.invalid("start the container")),
        }
    }

    // =========================================================================
    // ImagePulled | Running -> Stopped
    // =========================================================================

    /// Record a stop request. A unit that cannot have a container
    /// (uninstalled or already stopped) has nothing to stop, so the request
    /// is satisfied immediately and nothing is recorded.
    ///
    /// Returns whether a request is now pending.
    pub fn request_stop(&mut self) -> bool {
        if self.lifecycle.may_have_container() {
            self.stop_requested = true;
        }
        self.stop_requested
    }

    /// Complete a stop. Returns the port that was open, if any.
    pub fn record_stopped(&mut self) -> Result<Option<Port>, TransitionError> {
        match self.lifecycle {
            LifecycleState::ImagePulled | LifecycleState::Running => {
                self.lifecycle = LifecycleState::Stopped;
                self.stop_requested = false;
                Ok(self.opened_port.take())
            }
            _ => Err(self.invalid("stop the container")),
        }
    }

    // =========================================================================
    // Uninstalled | Stopped -> Uninstalled
    // =========================================================================

    /// Forget the pulled image after switching runtimes. Only allowed once no
    /// container can be left behind on the old runtime.
    pub fn record_runtime_changed(&mut self) -> Result<(), TransitionError> {
        match self.lifecycle {
            LifecycleState::Uninstalled | LifecycleState::Stopped => {
                self.lifecycle = LifecycleState::Uninstalled;
                Ok(())
            }
            _ => Err(self.invalid("switch runtimes")),
        }
    }
}
