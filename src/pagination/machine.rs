//! The pagination machine.
//!
//! A single `Ready` state; all interesting data lives in the context.
//! Moving between pages is guarded so the current page never drops
//! below 1, and optionally never passes the known total.

use crate::core::{Guard, StateHistory, StateTransition, DEFAULT_HISTORY_LIMIT};
use crate::state_enum;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

state_enum! {
    /// State tag of the pagination machine.
    pub enum PaginationState {
        Ready,
    }
}

/// Context of the pagination machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationContext {
    /// Always at least 1
    pub current_page: u32,
    /// 0 until a total has been received
    pub total_pages: u32,
}

impl Default for PaginationContext {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
        }
    }
}

/// Events the pagination machine accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaginationEvent {
    NextPage,
    PrevPage,
    UpdateTotalPages { total_pages: u32 },
}

impl PaginationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NextPage => "NextPage",
            Self::PrevPage => "PrevPage",
            Self::UpdateTotalPages { .. } => "UpdateTotalPages",
        }
    }
}

/// Messages the pagination machine emits for its coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginationOutput {
    PageChanged { page: u32 },
}

/// Whether `NextPage` may move past the known total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageBound {
    /// `NextPage` always advances
    #[default]
    Unbounded,
    /// `NextPage` stops at `total_pages` once a total is known
    Total,
}

impl PageBound {
    fn next_page_guard(self) -> Guard<PaginationContext> {
        match self {
            Self::Unbounded => Guard::always(),
            Self::Total => Guard::new(|ctx: &PaginationContext| {
                ctx.total_pages == 0 || ctx.current_page < ctx.total_pages
            }),
        }
    }
}

/// Tracks the current page and the total page count.
#[derive(Debug)]
pub struct PaginationMachine {
    state: PaginationState,
    context: PaginationContext,
    can_advance: Guard<PaginationContext>,
    can_go_back: Guard<PaginationContext>,
    outbox: VecDeque<PaginationOutput>,
    history: StateHistory<PaginationState>,
}

impl Default for PaginationMachine {
    fn default() -> Self {
        Self::new(PaginationContext::default())
    }
}

impl PaginationMachine {
    /// Create an unbounded machine. A `current_page` of 0 is raised to 1.
    pub fn new(context: PaginationContext) -> Self {
        Self {
            state: PaginationState::Ready,
            context: PaginationContext {
                current_page: context.current_page.max(1),
                ..context
            },
            can_advance: PageBound::Unbounded.next_page_guard(),
            can_go_back: Guard::new(|ctx: &PaginationContext| ctx.current_page > 1),
            outbox: VecDeque::new(),
            history: StateHistory::new().with_limit(DEFAULT_HISTORY_LIMIT),
        }
    }

    pub fn with_bound(mut self, bound: PageBound) -> Self {
        self.can_advance = bound.next_page_guard();
        self
    }

    /// Keep at most `limit` transitions in the history.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = self.history.with_limit(limit);
        self
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn context(&self) -> &PaginationContext {
        &self.context
    }

    pub fn current_page(&self) -> u32 {
        self.context.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.context.total_pages
    }

    pub fn history(&self) -> &StateHistory<PaginationState> {
        &self.history
    }

    /// Context after `event`, or `None` if the event is blocked.
    ///
    /// `NextPage` is also blocked on the last representable page.
    pub fn evaluate(&self, event: PaginationEvent) -> Option<PaginationContext> {
        let ctx = self.context;
        match event {
            PaginationEvent::NextPage if self.can_advance.check(&ctx) => ctx
                .current_page
                .checked_add(1)
                .map(|current_page| PaginationContext {
                    current_page,
                    ..ctx
                }),
            PaginationEvent::PrevPage if self.can_go_back.check(&ctx) => Some(PaginationContext {
                current_page: ctx.current_page - 1,
                ..ctx
            }),
            PaginationEvent::UpdateTotalPages { total_pages } => Some(PaginationContext {
                total_pages,
                ..ctx
            }),
            _ => None,
        }
    }

    /// Process one event. Returns `false` if a guard blocked it.
    pub fn send(&mut self, event: PaginationEvent) -> bool {
        let Some(next) = self.evaluate(event) else {
            debug!(
                event = event.name(),
                current_page = self.context.current_page,
                total_pages = self.context.total_pages,
                "pagination guard blocked event"
            );
            return false;
        };

        let previous = std::mem::replace(&mut self.context, next);
        if previous.current_page != next.current_page {
            self.outbox.push_back(PaginationOutput::PageChanged {
                page: next.current_page,
            });
        }

        debug!(
            event = event.name(),
            current_page = next.current_page,
            total_pages = next.total_pages,
            "pagination machine transitioned"
        );
        self.history = std::mem::take(&mut self.history).record(StateTransition::new(
            self.state,
            self.state,
            event.name(),
        ));
        true
    }

    /// Pop the next outbound message.
    pub fn take_output(&mut self) -> Option<PaginationOutput> {
        self.outbox.pop_front()
    }
}
