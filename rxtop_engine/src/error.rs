//! The engine's sole error surface.
//!
//! Every variant here is fatal per the step-level failure policy: a
//! step either completes cleanly or aborts the simulation. There is no
//! local recovery inside [`crate::engine::Engine::perform`] — callers
//! wanting to tolerate failures must checkpoint between steps.
use rxtop_core::TopologyHandle;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("attempted to use deactivated topology {handle:?} during a {context} event")]
    DeactivatedTopology {
        handle: TopologyHandle,
        context: &'static str,
    },

    #[error("topology graph invariant violated: {0}")]
    InvariantViolation(String),

    #[error("no registered reaction matches this event's educt types")]
    ReactionNotFound,

    #[error("educt types match neither orientation of the spatial reaction")]
    OrientationMismatch,

    #[error("post-execution check found a live event still sharing a topology with one just applied")]
    EventListCorruption,
}
