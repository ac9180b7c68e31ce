// ABOUTME: Lifecycle management of the nginx container as an explicit state machine.
// ABOUTME: Exports the controller, its events, guards, states and errors.

mod controller;
mod error;
mod event;
mod handlers;
mod state;
mod transitions;

pub use controller::Controller;
pub use error::CharmError;
pub use event::{EventError, HookEvent, RELATION_NAME};
pub use handlers::Handler;
pub use state::{CONFIG_KEY, CONTENT_KEY, ContentRecord, LifecycleState, STATE_KEY, UnitState};
pub use transitions::TransitionError;
