//! paged-fetch: coordinated data-fetch and pagination state machines
//!
//! Two small machines run side by side without knowing about each other:
//!
//! - **Data-fetch**: `Idle(NoError | Errored)` / `Fetching`, holding the last
//!   record or error message
//! - **Pagination**: current page and total page count
//!
//! A [`Coordinator`] fans events out to both, re-fetches whenever the current
//! page changes, and forwards the total page count of each response to the
//! pagination machine. Fetches run as cancellable tokio tasks against an
//! injected [`DataSource`](fetch::DataSource); a result that arrives after a
//! newer fetch was issued is discarded.
//!
//! # Example
//!
//! ```rust
//! use paged_fetch::{CoordinatorBuilder, Event};
//! use paged_fetch::fetch::{FetchState, IdleState};
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> Result<(), paged_fetch::BuildError> {
//! let mut coordinator = CoordinatorBuilder::new().delayed_source().build()?;
//! coordinator.run_until_idle().await;
//!
//! assert_eq!(
//!     coordinator.data_fetch().state(),
//!     FetchState::Idle(IdleState::NoError)
//! );
//! assert_eq!(coordinator.pagination().total_pages(), 20);
//!
//! coordinator.send(Event::NextPage);
//! assert_eq!(coordinator.data_fetch().state(), FetchState::Fetching);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod core;
pub mod fetch;
mod macros;
pub mod pagination;
pub mod snapshot;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use coordinator::{BuildError, Coordinator, CoordinatorBuilder, CoordinatorSnapshot, Event};
pub use crate::core::{Guard, State, StateHistory, StateTransition};
pub use snapshot::{Snapshot, SnapshotError};
