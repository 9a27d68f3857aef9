//! Runs both machines as one unit.
//!
//! Neither machine knows about the other. The coordinator fans inbound
//! events out to them, then drains their outboxes until both are empty:
//!
//! - `PageChanged(p)` from pagination becomes `Fetch { page: p }`
//! - `TotalPagesReceived(n)` from data-fetch becomes `UpdateTotalPages(n)`
//! - `Invoke` spawns a tokio task running the fetch effect
//! - `Abort` cancels that task
//!
//! Task completions are applied by [`Coordinator::next_completion`]; the
//! data-fetch machine discards any that are stale.

use super::event::Event;
use crate::fetch::{
    fetch_page, Completion, DataFetchMachine, FetchContext, FetchEnv, FetchError, FetchEvent,
    FetchOutput, FetchRequest, FetchState, Variables,
};
use crate::pagination::{
    PaginationContext, PaginationEvent, PaginationMachine, PaginationOutput, PaginationState,
};
use crate::snapshot::{Snapshot, SnapshotError};
use serde::{Deserialize, Serialize};
use stillwater::effect::Effect;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

struct InFlight {
    request: FetchRequest,
    handle: JoinHandle<Completion>,
}

/// Snapshots of both machines, taken together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorSnapshot {
    pub coordinator: Uuid,
    pub data_fetch: Snapshot<FetchState, FetchContext>,
    pub pagination: Snapshot<PaginationState, PaginationContext>,
}

impl CoordinatorSnapshot {
    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }
}

/// Owns the data-fetch and pagination machines and the in-flight fetch.
///
/// Invocations are spawned on the runtime the coordinator was built in.
pub struct Coordinator {
    id: Uuid,
    fetch: DataFetchMachine,
    pagination: PaginationMachine,
    env: FetchEnv,
    runtime: Handle,
    in_flight: Option<InFlight>,
    dispatched: Vec<Variables>,
    dispatch_limit: usize,
}

impl Coordinator {
    /// Wire the machines together and start the initial invocation.
    ///
    /// At most `dispatch_limit` page-change fetches are remembered.
    pub(crate) fn start(
        fetch: DataFetchMachine,
        pagination: PaginationMachine,
        env: FetchEnv,
        runtime: Handle,
        dispatch_limit: usize,
    ) -> Self {
        let mut coordinator = Self {
            id: Uuid::new_v4(),
            fetch,
            pagination,
            env,
            runtime,
            in_flight: None,
            dispatched: Vec::new(),
            dispatch_limit,
        };
        info!(
            coordinator = %coordinator.id,
            page = coordinator.pagination.current_page(),
            "coordinator started"
        );
        coordinator.drain();
        coordinator
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn data_fetch(&self) -> &DataFetchMachine {
        &self.fetch
    }

    pub fn pagination(&self) -> &PaginationMachine {
        &self.pagination
    }

    /// The most recent `Fetch`es issued because the current page changed,
    /// oldest first.
    pub fn dispatched_fetches(&self) -> &[Variables] {
        &self.dispatched
    }

    /// Hand over the remembered page-change fetches and forget them.
    pub fn take_dispatched_fetches(&mut self) -> Vec<Variables> {
        std::mem::take(&mut self.dispatched)
    }

    /// The invocation currently running, if any.
    pub fn in_flight(&self) -> Option<FetchRequest> {
        self.in_flight.as_ref().map(|f| f.request)
    }

    /// Fan an event out to the machines and run to completion.
    pub fn send(&mut self, event: impl Into<Event>) {
        let event = event.into();
        debug!(coordinator = %self.id, event = event.name(), "dispatching event");

        let (fetch_event, pagination_event) = event.route();
        if let Some(event) = fetch_event {
            self.fetch.send(event);
        }
        if let Some(event) = pagination_event {
            self.pagination.send(event);
        }
        self.drain();
    }

    /// Wait for the in-flight invocation and apply its result.
    ///
    /// Returns `false` when nothing was in flight or the result was stale.
    /// Cancel-safe: dropping the future leaves the invocation running.
    pub async fn next_completion(&mut self) -> bool {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return false;
        };
        let request = in_flight.request;
        let joined = (&mut in_flight.handle).await;
        self.in_flight = None;

        let completion = match joined {
            Ok(completion) => completion,
            Err(error) if error.is_cancelled() => return false,
            Err(error) => {
                warn!(
                    coordinator = %self.id,
                    sequence = request.sequence,
                    %error,
                    "fetch task failed"
                );
                Completion {
                    sequence: request.sequence,
                    result: Err(FetchError::failed(format!("fetch task failed: {error}"))),
                }
            }
        };

        let applied = self.fetch.complete(completion);
        self.drain();
        applied
    }

    /// Apply completions until the data-fetch machine leaves `Fetching`.
    pub async fn run_until_idle(&mut self) {
        while self.fetch.is_fetching() && self.in_flight.is_some() {
            self.next_completion().await;
        }
    }

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            coordinator: self.id,
            data_fetch: Snapshot::new("dataFetch", self.fetch.state(), self.fetch.context().clone()),
            pagination: Snapshot::new(
                "pagination",
                self.pagination.state(),
                *self.pagination.context(),
            ),
        }
    }

    fn drain(&mut self) {
        loop {
            if let Some(PaginationOutput::PageChanged { page }) = self.pagination.take_output() {
                let variables = Variables::page(page);
                debug!(coordinator = %self.id, page, "page changed, fetching");
                self.record_dispatch(variables);
                self.fetch.send(FetchEvent::Fetch { variables });
                continue;
            }

            match self.fetch.take_output() {
                Some(FetchOutput::Invoke(request)) => self.invoke(request),
                Some(FetchOutput::Abort { sequence }) => self.abort(sequence),
                Some(FetchOutput::TotalPagesReceived { total_pages }) => {
                    self.pagination
                        .send(PaginationEvent::UpdateTotalPages { total_pages });
                }
                None => break,
            }
        }
    }

    fn invoke(&mut self, request: FetchRequest) {
        if let Some(previous) = self.in_flight.take() {
            previous.handle.abort();
        }

        debug!(
            coordinator = %self.id,
            sequence = request.sequence,
            page = request.page,
            "starting fetch"
        );
        let env = self.env.clone();
        let handle = self.runtime.spawn(async move {
            let result = fetch_page(request.page).run(&env).await;
            Completion {
                sequence: request.sequence,
                result,
            }
        });
        self.in_flight = Some(InFlight { request, handle });
    }

    fn record_dispatch(&mut self, variables: Variables) {
        self.dispatched.push(variables);
        let excess = self.dispatched.len().saturating_sub(self.dispatch_limit);
        self.dispatched.drain(..excess);
    }

    fn abort(&mut self, sequence: u64) {
        let matches = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.request.sequence == sequence);
        if !matches {
            return;
        }
        if let Some(in_flight) = self.in_flight.take() {
            debug!(coordinator = %self.id, sequence, "aborting fetch");
            in_flight.handle.abort();
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
        }
    }
}
