//! Transition history tracking.
//!
//! Every machine keeps an ordered log of the transitions it took, including
//! self-transitions, together with the event that caused each one. A limited
//! history keeps only the most recent transitions.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of transitions a machine keeps unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use paged_fetch::core::StateTransition;
/// use paged_fetch::fetch::{FetchState, IdleState};
///
/// let transition = StateTransition::new(
///     FetchState::Fetching,
///     FetchState::Idle(IdleState::NoError),
///     "ReceiveData",
/// );
/// assert_eq!(transition.event, "ReceiveData");
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left
    pub from: S,
    /// The state being entered
    pub to: S,
    /// Name of the event that triggered the transition
    pub event: String,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateTransition<S> {
    /// Create a transition stamped with the current time.
    pub fn new(from: S, to: S, event: impl Into<String>) -> Self {
        Self {
            from,
            to,
            event: event.into(),
            timestamp: Utc::now(),
        }
    }

    /// True when the transition re-entered the state it left.
    pub fn is_reentry(&self) -> bool {
        self.from == self.to
    }
}

/// Ordered history of state transitions.
///
/// `record` consumes the history and returns it with the transition appended.
/// When a limit is set, the oldest transitions are dropped to stay within it.
///
/// # Example
///
/// ```rust
/// use paged_fetch::core::{StateHistory, StateTransition};
/// use paged_fetch::fetch::{FetchState, IdleState};
///
/// let history = StateHistory::new()
///     .record(StateTransition::new(
///         FetchState::Fetching,
///         FetchState::Fetching,
///         "Fetch",
///     ))
///     .record(StateTransition::new(
///         FetchState::Fetching,
///         FetchState::Idle(IdleState::NoError),
///         "ReceiveData",
///     ));
///
/// assert_eq!(history.get_path().len(), 3);
/// assert_eq!(history.events(), vec!["Fetch", "ReceiveData"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            limit: None,
        }
    }

    /// Keep at most `limit` transitions, dropping the oldest first.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self.trim();
        self
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Append a transition.
    pub fn record(mut self, transition: StateTransition<S>) -> Self {
        self.transitions.push(transition);
        self.trim();
        self
    }

    /// Sequence of states visited, starting with the first `from`.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Names of the triggering events, in order.
    pub fn events(&self) -> Vec<&str> {
        self.transitions.iter().map(|t| t.event.as_str()).collect()
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    fn trim(&mut self) {
        if let Some(limit) = self.limit {
            let excess = self.transitions.len().saturating_sub(limit);
            self.transitions.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Light {
        Off,
        On,
    }

    impl State for Light {
        fn name(&self) -> &str {
            match self {
                Self::Off => "Off",
                Self::On => "On",
            }
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<Light> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert_eq!(history.limit(), None);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let history = StateHistory::new()
            .record(StateTransition::new(Light::Off, Light::On, "Toggle"))
            .record(StateTransition::new(Light::On, Light::Off, "Toggle"));

        let path = history.get_path();
        assert_eq!(path, vec![&Light::Off, &Light::On, &Light::Off]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn reentry_is_detected() {
        let transition = StateTransition::new(Light::On, Light::On, "Refresh");
        assert!(transition.is_reentry());
        assert!(!StateTransition::new(Light::On, Light::Off, "Toggle").is_reentry());
    }

    #[test]
    fn limited_history_keeps_most_recent() {
        let mut history = StateHistory::new().with_limit(3);
        for event in ["a", "b", "c", "d", "e"] {
            history = history.record(StateTransition::new(Light::Off, Light::On, event));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.events(), vec!["c", "d", "e"]);
    }

    #[test]
    fn applying_limit_trims_existing_transitions() {
        let history = StateHistory::new()
            .record(StateTransition::new(Light::Off, Light::On, "Toggle"))
            .record(StateTransition::new(Light::On, Light::Off, "Toggle"))
            .with_limit(1);

        assert_eq!(history.get_path(), vec![&Light::On, &Light::Off]);
    }

    #[test]
    fn limit_survives_serialization() {
        let history = StateHistory::new()
            .with_limit(2)
            .record(StateTransition::new(Light::Off, Light::On, "Toggle"));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<Light> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.limit(), Some(2));
    }

    #[test]
    fn history_serializes_correctly() {
        let history =
            StateHistory::new().record(StateTransition::new(Light::Off, Light::On, "Toggle"));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<Light> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.events(), vec!["Toggle"]);
        assert_eq!(deserialized.last().map(|t| &t.to), Some(&Light::On));
    }
}
