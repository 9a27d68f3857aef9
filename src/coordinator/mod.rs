//! Coordination of the data-fetch and pagination machines.
//!
//! - [`Event`]: the merged inbound event type
//! - [`Coordinator`]: fan-out dispatch, outbox translation, invocations
//! - [`CoordinatorBuilder`]: validated construction from a [`Config`](crate::Config)

pub mod builder;
mod bridge;
mod event;

pub use bridge::{Coordinator, CoordinatorSnapshot};
pub use builder::{BuildError, CoordinatorBuilder};
pub use event::Event;
