//! Read-only snapshots of machine state.
//!
//! A snapshot captures a machine's state tag, its dotted state path and its
//! context at one instant. Snapshots encode to JSON for display and test
//! assertions, and to a compact binary form.

use crate::core::State;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable view of one machine.
///
/// # Example
///
/// ```rust
/// use paged_fetch::fetch::{FetchContext, FetchState, IdleState};
/// use paged_fetch::snapshot::Snapshot;
///
/// let snapshot = Snapshot::new(
///     "dataFetch",
///     FetchState::Idle(IdleState::Errored),
///     FetchContext {
///         data: None,
///         error_message: Some("timeout".to_string()),
///     },
/// );
///
/// assert_eq!(snapshot.value, "Idle.Errored");
/// let json = snapshot.to_json().unwrap();
/// assert!(json.contains("\"timeout\""));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "C: Serialize", deserialize = "C: DeserializeOwned"))]
pub struct Snapshot<S: State, C> {
    /// Snapshot format version
    pub version: u32,

    /// Which machine this is
    pub machine: String,

    /// Dotted state path, e.g. `Idle.NoError`
    pub value: String,

    /// The state tag itself
    pub state: S,

    /// Machine context at the time of the snapshot
    pub context: C,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,
}

impl<S, C> Snapshot<S, C>
where
    S: State,
    C: Serialize + DeserializeOwned,
{
    pub fn new(machine: impl Into<String>, state: S, context: C) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            machine: machine.into(),
            value: state.path(),
            state,
            context,
            taken_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    fn check_version(self) -> Result<Self, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(self)
    }
}
