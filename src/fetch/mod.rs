//! The data-fetch machine and its invocation plumbing.
//!
//! - [`DataFetchMachine`]: pure state tracking, outbox of requests
//! - [`DataSource`] / [`FetchEnv`]: the injected asynchronous source
//! - [`fetch_page`]: the effect one invocation runs

mod context;
mod error;
mod event;
mod machine;
mod source;

pub use context::{FetchContext, FetchResponse, Record, Variables};
pub use error::FetchError;
pub use event::{Completion, FetchEvent, FetchOutput, FetchRequest};
pub use machine::{DataFetchMachine, FetchState, FetchStep, IdleState, DEFAULT_ERROR_MESSAGE};
pub use source::{fetch_page, DataSource, DelayedSource, FetchEnv, DEFAULT_FETCH_DELAY};
