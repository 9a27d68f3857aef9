//! Building blocks shared by both machines.
//!
//! - State tags via the `State` trait
//! - Guard predicates over machine contexts
//! - Transition history
//!
//! Nothing in this module performs I/O.

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
pub use state::State;
