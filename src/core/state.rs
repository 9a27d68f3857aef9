//! State tags for the coordinated machines.
//!
//! A machine's state is a small tag value kept apart from its context. The
//! `State` trait gives every tag a display name and a dotted path that
//! includes nested sub-states, so snapshots and logs can show
//! `Idle.Errored` rather than only `Idle`.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine state tags.
///
/// All methods are pure. Tags are cheap values describing where a machine
/// currently is; the data a machine carries lives in its context.
///
/// # Example
///
/// ```rust
/// use paged_fetch::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
///     Jammed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///             Self::Jammed => "Jammed",
///         }
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Jammed)
///     }
/// }
///
/// assert_eq!(Door::Jammed.path(), "Jammed");
/// assert!(Door::Jammed.is_error());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Name of the outermost state, for display and logging.
    fn name(&self) -> &str;

    /// Full dotted path including nested sub-states.
    ///
    /// Defaults to `name()` for flat states.
    fn path(&self) -> String {
        self.name().to_string()
    }

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this state represents a failure.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
