//! End-to-end tests of the coordinator against fake data sources.
//!
//! Time is paused, so source delays elapse instantly and deterministically.

use async_trait::async_trait;
use paged_fetch::fetch::{
    DataSource, DelayedSource, FetchError, FetchEvent, FetchResponse, FetchState, IdleState,
    Record, Variables,
};
use paged_fetch::core::DEFAULT_HISTORY_LIMIT;
use paged_fetch::{Config, CoordinatorBuilder, Event, State};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Answers with the requested page in the record name and logs every call.
#[derive(Clone, Default)]
struct RecordingSource {
    delay: Duration,
    calls: Arc<Mutex<Vec<u32>>>,
}

impl RecordingSource {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            calls: Arc::default(),
        }
    }

    fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataSource for RecordingSource {
    async fn fetch(&self, page: u32) -> Result<FetchResponse, FetchError> {
        self.calls.lock().unwrap().push(page);
        tokio::time::sleep(self.delay).await;
        Ok(FetchResponse {
            data: Record::new(format!("page {page}")),
            total_pages: 10,
        })
    }
}

/// Always fails with the configured error.
struct FailingSource(FetchError);

#[async_trait]
impl DataSource for FailingSource {
    async fn fetch(&self, _page: u32) -> Result<FetchResponse, FetchError> {
        Err(self.0.clone())
    }
}

/// Panics instead of answering.
struct PanickingSource;

#[async_trait]
impl DataSource for PanickingSource {
    async fn fetch(&self, page: u32) -> Result<FetchResponse, FetchError> {
        panic!("source crashed on page {page}");
    }
}

/// Fails the first call, then answers like `RecordingSource`.
#[derive(Default)]
struct FailsOnceSource {
    calls: AtomicU32,
}

#[async_trait]
impl DataSource for FailsOnceSource {
    async fn fetch(&self, page: u32) -> Result<FetchResponse, FetchError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(FetchError::failed("temporarily unavailable"));
        }
        Ok(FetchResponse {
            data: Record::new(format!("page {page}")),
            total_pages: 10,
        })
    }
}

#[tokio::test(start_paused = true)]
async fn first_page_is_fetched_and_total_propagated() {
    let mut coordinator = CoordinatorBuilder::new()
        .delayed_source()
        .build()
        .unwrap();
    assert_eq!(coordinator.pagination().current_page(), 1);
    assert_eq!(coordinator.data_fetch().state(), FetchState::Fetching);

    let started = tokio::time::Instant::now();
    coordinator.run_until_idle().await;

    assert!(started.elapsed() >= Duration::from_millis(800));
    let data = coordinator.data_fetch().context().data.clone();
    assert_eq!(data.map(|d| d.name), Some("Hey".to_string()));
    assert_eq!(coordinator.pagination().total_pages(), 20);
}

#[tokio::test(start_paused = true)]
async fn explicit_fetch_restarts_and_receives() {
    let mut coordinator = CoordinatorBuilder::new()
        .delayed_source()
        .build()
        .unwrap();

    coordinator.send(FetchEvent::fetch(1));
    assert_eq!(coordinator.data_fetch().state(), FetchState::Fetching);

    coordinator.run_until_idle().await;

    assert_eq!(
        coordinator.data_fetch().context().data,
        Some(Record::new("Hey"))
    );
    assert_eq!(coordinator.pagination().total_pages(), 20);
}

#[tokio::test(start_paused = true)]
async fn three_next_pages_dispatch_three_fetches() {
    let source = RecordingSource::with_delay(Duration::from_millis(50));
    let mut coordinator = CoordinatorBuilder::new()
        .source(source.clone())
        .build()
        .unwrap();

    for _ in 0..3 {
        coordinator.send(Event::NextPage);
    }

    assert_eq!(coordinator.pagination().current_page(), 4);
    assert_eq!(
        coordinator.dispatched_fetches(),
        &[Variables::page(2), Variables::page(3), Variables::page(4)]
    );

    coordinator.run_until_idle().await;

    assert_eq!(
        coordinator.data_fetch().context().data,
        Some(Record::new("page 4"))
    );
    assert_eq!(source.calls().last(), Some(&4));
}

#[tokio::test(start_paused = true)]
async fn superseded_fetch_result_is_never_applied() {
    let source = RecordingSource::with_delay(Duration::from_millis(100));
    let mut coordinator = CoordinatorBuilder::new()
        .source(source.clone())
        .build()
        .unwrap();

    // Let the page-1 call begin before superseding it.
    tokio::time::sleep(Duration::from_millis(10)).await;
    coordinator.send(Event::NextPage);
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(coordinator.next_completion().await);

    assert_eq!(
        coordinator.data_fetch().context().data,
        Some(Record::new("page 2"))
    );
    assert_eq!(source.calls(), vec![1, 2]);
    let events = coordinator.data_fetch().history().events();
    assert_eq!(events, vec!["Fetch", "ReceiveData"]);
}

#[tokio::test(start_paused = true)]
async fn fetch_while_fetching_keeps_previous_data() {
    let mut coordinator = CoordinatorBuilder::new()
        .source(RecordingSource::with_delay(Duration::from_millis(20)))
        .build()
        .unwrap();
    coordinator.run_until_idle().await;

    coordinator.send(FetchEvent::fetch(5));
    coordinator.send(FetchEvent::fetch(6));

    assert_eq!(coordinator.data_fetch().state(), FetchState::Fetching);
    assert_eq!(
        coordinator.data_fetch().context().data,
        Some(Record::new("page 1"))
    );
}

#[tokio::test(start_paused = true)]
async fn failure_without_message_uses_fallback() {
    let mut coordinator = CoordinatorBuilder::new()
        .source(FailingSource(FetchError::Unspecified))
        .build()
        .unwrap();

    coordinator.run_until_idle().await;

    let fetch = coordinator.data_fetch();
    assert_eq!(fetch.state(), FetchState::Idle(IdleState::Errored));
    assert!(fetch.state().is_error());
    assert_eq!(
        fetch.context().error_message.as_deref(),
        Some("An unknown error occurred")
    );
    assert_eq!(coordinator.pagination().total_pages(), 0);
}

#[tokio::test(start_paused = true)]
async fn failure_message_is_stored_and_retry_needs_fetch() {
    let mut coordinator = CoordinatorBuilder::new()
        .source(FailingSource(FetchError::failed("timeout")))
        .build()
        .unwrap();

    coordinator.run_until_idle().await;
    assert_eq!(
        coordinator.data_fetch().context().error_message.as_deref(),
        Some("timeout")
    );
    assert_eq!(coordinator.in_flight(), None);

    // Nothing retries on its own.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(
        coordinator.data_fetch().state(),
        FetchState::Idle(IdleState::Errored)
    );

    coordinator.send(FetchEvent::fetch(1));
    assert_eq!(coordinator.data_fetch().state(), FetchState::Fetching);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_fetching_and_clears_error() {
    let config = Config {
        fallback_error_message: "something broke".to_string(),
        ..Config::default()
    };
    let mut coordinator = CoordinatorBuilder::new()
        .config(config)
        .source(FailingSource(FetchError::Unspecified))
        .build()
        .unwrap();
    coordinator.run_until_idle().await;
    assert_eq!(
        coordinator.data_fetch().context().error_message.as_deref(),
        Some("something broke")
    );

    coordinator.send(FetchEvent::fetch(1));
    coordinator.send(Event::Cancel);

    assert_eq!(
        coordinator.data_fetch().state(),
        FetchState::Idle(IdleState::NoError)
    );
    assert_eq!(coordinator.data_fetch().context().error_message, None);
    assert_eq!(coordinator.in_flight(), None);
}

#[tokio::test(start_paused = true)]
async fn panicking_source_ends_in_errored() {
    let mut coordinator = CoordinatorBuilder::new()
        .source(PanickingSource)
        .build()
        .unwrap();

    coordinator.run_until_idle().await;

    let fetch = coordinator.data_fetch();
    assert_eq!(fetch.state(), FetchState::Idle(IdleState::Errored));
    let message = fetch.context().error_message.clone().unwrap_or_default();
    assert!(message.starts_with("fetch task failed"), "{message}");
    assert_eq!(coordinator.in_flight(), None);
}

#[tokio::test(start_paused = true)]
async fn successful_retry_after_failure_clears_error() {
    let mut coordinator = CoordinatorBuilder::new()
        .source(FailsOnceSource::default())
        .build()
        .unwrap();
    coordinator.run_until_idle().await;
    assert_eq!(
        coordinator.data_fetch().state(),
        FetchState::Idle(IdleState::Errored)
    );

    coordinator.send(FetchEvent::fetch(1));
    coordinator.run_until_idle().await;

    let fetch = coordinator.data_fetch();
    assert_eq!(fetch.state(), FetchState::Idle(IdleState::NoError));
    assert_eq!(fetch.context().error_message, None);
    assert_eq!(fetch.context().data, Some(Record::new("page 1")));
}

#[tokio::test(start_paused = true)]
async fn long_session_stays_within_history_limit() {
    let mut coordinator = CoordinatorBuilder::new()
        .source(RecordingSource::with_delay(Duration::from_millis(5)))
        .build()
        .unwrap();

    for _ in 0..5_000 {
        coordinator.send(Event::NextPage);
        coordinator.send(Event::PrevPage);
    }
    coordinator.run_until_idle().await;

    assert_eq!(coordinator.pagination().current_page(), 1);
    assert!(coordinator.data_fetch().history().len() <= DEFAULT_HISTORY_LIMIT);
    assert_eq!(
        coordinator.pagination().history().len(),
        DEFAULT_HISTORY_LIMIT
    );
    assert_eq!(
        coordinator.dispatched_fetches().len(),
        DEFAULT_HISTORY_LIMIT
    );
    assert_eq!(
        coordinator.data_fetch().context().data,
        Some(Record::new("page 1"))
    );
}

#[tokio::test(start_paused = true)]
async fn prev_page_on_first_page_does_not_fetch() {
    let mut coordinator = CoordinatorBuilder::new()
        .source(RecordingSource::with_delay(Duration::from_millis(5)))
        .build()
        .unwrap();
    coordinator.run_until_idle().await;

    coordinator.send(Event::PrevPage);

    assert_eq!(coordinator.pagination().current_page(), 1);
    assert!(coordinator.dispatched_fetches().is_empty());
    assert_eq!(
        coordinator.data_fetch().state(),
        FetchState::Idle(IdleState::NoError)
    );
}

#[tokio::test(start_paused = true)]
async fn snapshot_serializes_both_machines() {
    let mut coordinator = CoordinatorBuilder::new()
        .shared_source(Arc::new(DelayedSource::new(Duration::from_millis(1))))
        .build()
        .unwrap();
    coordinator.run_until_idle().await;
    coordinator.send(Event::NextPage);

    let json = coordinator.snapshot().to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["data_fetch"]["value"], "Fetching");
    assert_eq!(value["data_fetch"]["context"]["data"]["name"], "Hey");
    assert_eq!(value["pagination"]["value"], "Ready");
    assert_eq!(value["pagination"]["context"]["current_page"], 2);
    assert_eq!(value["pagination"]["context"]["total_pages"], 20);
}
