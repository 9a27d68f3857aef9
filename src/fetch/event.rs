//! Inbound events and outbound messages of the data-fetch machine.

use super::context::{FetchResponse, Record, Variables};
use super::error::FetchError;
use serde::{Deserialize, Serialize};

/// Events the data-fetch machine accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchEvent {
    /// Start (or restart) fetching with these variables
    Fetch { variables: Variables },
    /// Data arrived for the current invocation
    ReceiveData { data: Record, total_pages: u32 },
    /// Stop fetching
    Cancel,
}

impl FetchEvent {
    pub fn fetch(page: u32) -> Self {
        Self::Fetch {
            variables: Variables::page(page),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "Fetch",
            Self::ReceiveData { .. } => "ReceiveData",
            Self::Cancel => "Cancel",
        }
    }
}

/// A request to run one fetch invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Identifies the invocation; strictly increasing per machine
    pub sequence: u64,
    pub page: u32,
}

/// Result of an invocation, posted back to the machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub sequence: u64,
    pub result: Result<FetchResponse, FetchError>,
}

/// Messages the data-fetch machine emits for its coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutput {
    /// Start an invocation
    Invoke(FetchRequest),
    /// The invocation with this sequence is no longer wanted
    Abort { sequence: u64 },
    /// Data was received along with the total page count
    TotalPagesReceived { total_pages: u32 },
}
