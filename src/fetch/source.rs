//! Injectable data sources and the fetch effect.
//!
//! The invocation runs as a Stillwater effect against a [`FetchEnv`], so the
//! machine never sees the source and tests swap it for a fake.

use super::context::{FetchResponse, Record};
use super::error::FetchError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use stillwater::effect::Effect;
use stillwater::prelude::*;

/// Delay used by [`DelayedSource::default`].
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(800);

/// Asynchronous source of pages.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch one page.
    async fn fetch(&self, page: u32) -> Result<FetchResponse, FetchError>;
}

/// Stand-in source answering every page with the same payload after a
/// fixed delay.
///
/// # Example
///
/// ```rust
/// use paged_fetch::fetch::{DataSource, DelayedSource};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = DelayedSource::new(Duration::from_millis(1));
/// let response = source.fetch(3).await.unwrap();
/// assert_eq!(response.data.name, "Hey");
/// assert_eq!(response.total_pages, 20);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DelayedSource {
    delay: Duration,
    response: FetchResponse,
}

impl DelayedSource {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            response: FetchResponse {
                data: Record::new("Hey"),
                total_pages: 20,
            },
        }
    }

    /// Answer with `response` instead of the built-in payload.
    pub fn with_response(mut self, response: FetchResponse) -> Self {
        self.response = response;
        self
    }
}

impl Default for DelayedSource {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_DELAY)
    }
}

#[async_trait]
impl DataSource for DelayedSource {
    async fn fetch(&self, _page: u32) -> Result<FetchResponse, FetchError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }
}

/// Environment the fetch effect runs against.
#[derive(Clone)]
pub struct FetchEnv {
    source: Arc<dyn DataSource>,
}

impl FetchEnv {
    pub fn new<D: DataSource + 'static>(source: D) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn from_shared(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> Arc<dyn DataSource> {
        Arc::clone(&self.source)
    }
}

impl fmt::Debug for FetchEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchEnv").finish_non_exhaustive()
    }
}

/// Effect fetching `page` from the environment's source.
pub fn fetch_page(
    page: u32,
) -> impl Effect<Output = FetchResponse, Error = FetchError, Env = FetchEnv> {
    from_async(move |env: &FetchEnv| {
        let source = env.source();
        async move { source.fetch(page).await }
    })
}
