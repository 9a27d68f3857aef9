//! Builder for constructing coordinators.

use super::bridge::Coordinator;
use crate::config::{Config, ConfigError};
use crate::fetch::{DataFetchMachine, DataSource, DelayedSource, FetchEnv};
use crate::pagination::{PaginationContext, PaginationMachine};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;

/// Errors that can occur when building a coordinator.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Data source not specified. Call .source(..) or .delayed_source() before .build()")]
    MissingDataSource,

    #[error("No Tokio runtime found. Call .build() from within a Tokio runtime")]
    NoRuntime,

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

enum SourceChoice {
    Unset,
    Delayed,
    Custom(FetchEnv),
}

/// Builder for [`Coordinator`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use paged_fetch::{Config, CoordinatorBuilder};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), paged_fetch::BuildError> {
/// let coordinator = CoordinatorBuilder::new()
///     .config(Config::default())
///     .delayed_source()
///     .build()?;
///
/// assert_eq!(coordinator.pagination().current_page(), 1);
/// # Ok(())
/// # }
/// ```
pub struct CoordinatorBuilder {
    config: Config,
    source: SourceChoice,
}

impl CoordinatorBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            source: SourceChoice::Unset,
        }
    }

    /// Replace the configuration (defaults otherwise).
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use `source` for every fetch.
    pub fn source<D: DataSource + 'static>(mut self, source: D) -> Self {
        self.source = SourceChoice::Custom(FetchEnv::new(source));
        self
    }

    /// Use an already shared source.
    pub fn shared_source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.source = SourceChoice::Custom(FetchEnv::from_shared(source));
        self
    }

    /// Use a [`DelayedSource`] with the configured delay.
    pub fn delayed_source(mut self) -> Self {
        self.source = SourceChoice::Delayed;
        self
    }

    /// Validate, build, and start the initial fetch.
    ///
    /// Must be called inside a Tokio runtime; fetches are spawned on it.
    pub fn build(self) -> Result<Coordinator, BuildError> {
        self.config.validate()?;

        let env = match self.source {
            SourceChoice::Unset => return Err(BuildError::MissingDataSource),
            SourceChoice::Delayed => FetchEnv::new(DelayedSource::new(self.config.fetch_delay())),
            SourceChoice::Custom(env) => env,
        };
        let runtime = Handle::try_current().map_err(|_| BuildError::NoRuntime)?;

        let fetch = DataFetchMachine::new(self.config.initial_page)
            .with_fallback_error_message(self.config.fallback_error_message.clone())
            .with_history_limit(self.config.history_limit);
        let pagination = PaginationMachine::new(PaginationContext {
            current_page: self.config.initial_page,
            total_pages: 0,
        })
        .with_bound(self.config.page_bound)
        .with_history_limit(self.config.history_limit);

        Ok(Coordinator::start(
            fetch,
            pagination,
            env,
            runtime,
            self.config.history_limit,
        ))
    }
}

impl Default for CoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
