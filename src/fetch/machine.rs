//! The data-fetch machine.
//!
//! States: `Idle(NoError | Errored)` and `Fetching`, starting in `Fetching`.
//! The machine performs no I/O itself. Entering `Fetching` pushes an
//! `Invoke` request onto the outbox; the coordinator runs it and posts the
//! result back through [`DataFetchMachine::complete`].

use super::context::{FetchContext, Record};
use super::event::{Completion, FetchEvent, FetchOutput, FetchRequest};
use crate::core::{State, StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
use crate::state_enum;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Message stored when a failed invocation gives no reason.
pub const DEFAULT_ERROR_MESSAGE: &str = "An unknown error occurred";

state_enum! {
    /// Sub-states of `Idle`.
    pub enum IdleState {
        NoError,
        Errored,
    }
    error: [Errored]
}

/// State tag of the data-fetch machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum FetchState {
    Idle(IdleState),
    Fetching,
}

impl State for FetchState {
    fn name(&self) -> &str {
        match self {
            Self::Idle(_) => "Idle",
            Self::Fetching => "Fetching",
        }
    }

    fn path(&self) -> String {
        match self {
            Self::Idle(idle) => format!("Idle.{}", idle.name()),
            Self::Fetching => "Fetching".to_string(),
        }
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Idle(idle) if idle.is_error())
    }
}

/// Transition chosen for an event, before it is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchStep {
    /// Enter or re-enter `Fetching`
    StartFetching { page: u32 },
    /// Leave `Fetching` for `Idle.NoError` without a result
    Cancel,
    /// Store the data and enter `Idle.NoError`
    Receive { data: Record, total_pages: u32 },
    /// Store the message and enter `Idle.Errored`
    Fail { message: String },
}

/// Tracks the lifecycle of a single logical fetch.
#[derive(Debug)]
pub struct DataFetchMachine {
    state: FetchState,
    context: FetchContext,
    sequence: u64,
    current: Option<FetchRequest>,
    fallback_error_message: String,
    outbox: VecDeque<FetchOutput>,
    history: StateHistory<FetchState>,
}

impl DataFetchMachine {
    /// Create the machine in `Fetching`, with an invocation for
    /// `initial_page` waiting on the outbox.
    pub fn new(initial_page: u32) -> Self {
        let request = FetchRequest {
            sequence: 1,
            page: initial_page,
        };
        Self {
            state: FetchState::Fetching,
            context: FetchContext::default(),
            sequence: request.sequence,
            current: Some(request),
            fallback_error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            outbox: VecDeque::from([FetchOutput::Invoke(request)]),
            history: StateHistory::new().with_limit(DEFAULT_HISTORY_LIMIT),
        }
    }

    /// Keep at most `limit` transitions in the history.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = self.history.with_limit(limit);
        self
    }

    /// Replace the message used for failures that carry none.
    pub fn with_fallback_error_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_error_message = message.into();
        self
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn context(&self) -> &FetchContext {
        &self.context
    }

    pub fn history(&self) -> &StateHistory<FetchState> {
        &self.history
    }

    pub fn is_fetching(&self) -> bool {
        self.state == FetchState::Fetching
    }

    /// The invocation whose result the machine is waiting for.
    pub fn current_request(&self) -> Option<FetchRequest> {
        self.current
    }

    /// Pick the transition for `event` from the current state.
    ///
    /// Returns `None` when the current state has no transition for it.
    pub fn evaluate(&self, event: &FetchEvent) -> Option<FetchStep> {
        match (self.state, event) {
            (_, FetchEvent::Fetch { variables }) => Some(FetchStep::StartFetching {
                page: variables.page,
            }),
            (FetchState::Fetching, FetchEvent::Cancel) => Some(FetchStep::Cancel),
            (FetchState::Fetching, FetchEvent::ReceiveData { data, total_pages }) => {
                Some(FetchStep::Receive {
                    data: data.clone(),
                    total_pages: *total_pages,
                })
            }
            (FetchState::Idle(_), _) => None,
        }
    }

    /// Process one event to completion.
    ///
    /// Returns `false` if the event was ignored.
    pub fn send(&mut self, event: FetchEvent) -> bool {
        match self.evaluate(&event) {
            Some(step) => {
                self.apply(step, event.name());
                true
            }
            None => {
                debug!(
                    event = event.name(),
                    state = %self.state.path(),
                    "data-fetch machine ignored event"
                );
                false
            }
        }
    }

    /// Apply the result of an invocation.
    ///
    /// Completions for anything other than the current invocation are stale
    /// and ignored; so are completions arriving outside `Fetching`.
    pub fn complete(&mut self, completion: Completion) -> bool {
        let is_current = self.is_fetching()
            && self
                .current
                .is_some_and(|request| request.sequence == completion.sequence);
        if !is_current {
            debug!(
                sequence = completion.sequence,
                current = ?self.current.map(|r| r.sequence),
                "discarding stale fetch completion"
            );
            return false;
        }

        // The invocation has finished; nothing left to abort.
        self.current = None;

        match completion.result {
            Ok(response) => self.apply(
                FetchStep::Receive {
                    data: response.data,
                    total_pages: response.total_pages,
                },
                "ReceiveData",
            ),
            Err(error) => {
                let message = error
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.fallback_error_message.clone());
                self.apply(FetchStep::Fail { message }, "FetchFailed");
            }
        }
        true
    }

    /// Pop the next outbound message.
    pub fn take_output(&mut self) -> Option<FetchOutput> {
        self.outbox.pop_front()
    }

    fn apply(&mut self, step: FetchStep, event: &str) {
        let from = self.state;
        match step {
            FetchStep::StartFetching { page } => {
                self.abort_current();
                self.sequence += 1;
                let request = FetchRequest {
                    sequence: self.sequence,
                    page,
                };
                self.current = Some(request);
                self.state = FetchState::Fetching;
                self.outbox.push_back(FetchOutput::Invoke(request));
            }
            FetchStep::Cancel => {
                self.abort_current();
                self.enter_no_error();
            }
            FetchStep::Receive { data, total_pages } => {
                self.abort_current();
                self.context.data = Some(data);
                self.enter_no_error();
                self.outbox
                    .push_back(FetchOutput::TotalPagesReceived { total_pages });
            }
            FetchStep::Fail { message } => {
                self.abort_current();
                self.context.error_message = Some(message);
                self.state = FetchState::Idle(IdleState::Errored);
            }
        }

        debug!(
            event,
            from = %from.path(),
            to = %self.state.path(),
            "data-fetch machine transitioned"
        );
        self.history = std::mem::take(&mut self.history)
            .record(StateTransition::new(from, self.state, event));
    }

    fn enter_no_error(&mut self) {
        self.context.error_message = None;
        self.state = FetchState::Idle(IdleState::NoError);
    }

    fn abort_current(&mut self) {
        if let Some(request) = self.current.take() {
            self.outbox.push_back(FetchOutput::Abort {
                sequence: request.sequence,
            });
        }
    }
}
