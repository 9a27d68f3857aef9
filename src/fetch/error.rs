//! Fetch failure type.

use thiserror::Error;

/// Failure reported by a data source.
///
/// The machine never propagates this error; it folds it into
/// `FetchContext::error_message` when the invocation completes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The source failed and said why
    #[error("{0}")]
    Failed(String),

    /// The source failed without a reason
    #[error("fetch failed without a message")]
    Unspecified,
}

impl FetchError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// The failure's message, if it carries a non-empty one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}
