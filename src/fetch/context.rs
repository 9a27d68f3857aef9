//! Data carried by the data-fetch machine.

use serde::{Deserialize, Serialize};

/// A fetched record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Parameters of a fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variables {
    pub page: u32,
}

impl Variables {
    pub fn page(page: u32) -> Self {
        Self { page }
    }
}

/// What a data source returns for one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub data: Record,
    pub total_pages: u32,
}

/// Context of the data-fetch machine.
///
/// Both fields start empty. `data` is only replaced by `ReceiveData`;
/// `error_message` is cleared every time `Idle.NoError` is entered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchContext {
    pub data: Option<Record>,
    pub error_message: Option<String>,
}
