//! The merged event type accepted by the coordinator.

use crate::fetch::{FetchEvent, Record, Variables};
use crate::pagination::PaginationEvent;
use serde::{Deserialize, Serialize};

/// Any event either machine understands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Fetch { variables: Variables },
    ReceiveData { data: Record, total_pages: u32 },
    Cancel,
    NextPage,
    PrevPage,
    UpdateTotalPages { total_pages: u32 },
}

impl Event {
    /// Split the event into what each machine should receive.
    pub fn route(self) -> (Option<FetchEvent>, Option<PaginationEvent>) {
        match self {
            Self::Fetch { variables } => (Some(FetchEvent::Fetch { variables }), None),
            Self::ReceiveData { data, total_pages } => {
                (Some(FetchEvent::ReceiveData { data, total_pages }), None)
            }
            Self::Cancel => (Some(FetchEvent::Cancel), None),
            Self::NextPage => (None, Some(PaginationEvent::NextPage)),
            Self::PrevPage => (None, Some(PaginationEvent::PrevPage)),
            Self::UpdateTotalPages { total_pages } => {
                (None, Some(PaginationEvent::UpdateTotalPages { total_pages }))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "Fetch",
            Self::ReceiveData { .. } => "ReceiveData",
            Self::Cancel => "Cancel",
            Self::NextPage => "NextPage",
            Self::PrevPage => "PrevPage",
            Self::UpdateTotalPages { .. } => "UpdateTotalPages",
        }
    }
}

impl From<FetchEvent> for Event {
    fn from(event: FetchEvent) -> Self {
        match event {
            FetchEvent::Fetch { variables } => Self::Fetch { variables },
            FetchEvent::ReceiveData { data, total_pages } => Self::ReceiveData { data, total_pages },
            FetchEvent::Cancel => Self::Cancel,
        }
    }
}

impl From<PaginationEvent> for Event {
    fn from(event: PaginationEvent) -> Self {
        match event {
            PaginationEvent::NextPage => Self::NextPage,
            PaginationEvent::PrevPage => Self::PrevPage,
            PaginationEvent::UpdateTotalPages { total_pages } => {
                Self::UpdateTotalPages { total_pages }
            }
        }
    }
}
