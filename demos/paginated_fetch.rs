//! Paginated Fetch
//!
//! Drives a coordinator the way a UI would: fetch the first page, click
//! "next" a few times, click "prev", and hit a page whose fetch fails.
//! After each step both machine snapshots are printed as JSON.
//!
//! Key concepts:
//! - The data source is injected; here it fails on page 3
//! - Page changes trigger fetches automatically
//! - Received page counts flow into the pagination machine
//!
//! Run with: cargo run --example paginated_fetch
//! Set RUST_LOG=paged_fetch=debug to see every transition.

use async_trait::async_trait;
use paged_fetch::fetch::{DataSource, FetchError, FetchResponse, Record};
use paged_fetch::{Config, Coordinator, CoordinatorBuilder, Event};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

struct FlakySource {
    delay: Duration,
}

#[async_trait]
impl DataSource for FlakySource {
    async fn fetch(&self, page: u32) -> Result<FetchResponse, FetchError> {
        tokio::time::sleep(self.delay).await;
        if page == 3 {
            return Err(FetchError::failed("page 3 is unavailable"));
        }
        Ok(FetchResponse {
            data: Record::new(format!("Record on page {page}")),
            total_pages: 20,
        })
    }
}

fn print_snapshot(label: &str, coordinator: &Coordinator) -> Result<(), Box<dyn std::error::Error>> {
    println!("--- {label} ---");
    println!("{}", coordinator.snapshot().to_json_pretty()?);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load("paged-fetch.toml")?;
    let source = FlakySource {
        delay: config.fetch_delay(),
    };
    let mut coordinator = CoordinatorBuilder::new()
        .config(config)
        .source(source)
        .build()?;

    print_snapshot("started", &coordinator)?;
    coordinator.run_until_idle().await;
    print_snapshot("first page loaded", &coordinator)?;

    coordinator.send(Event::NextPage);
    coordinator.send(Event::NextPage);
    print_snapshot("next page clicked twice", &coordinator)?;
    coordinator.run_until_idle().await;
    print_snapshot("page 3 settled", &coordinator)?;

    coordinator.send(Event::PrevPage);
    coordinator.run_until_idle().await;
    print_snapshot("back to page 2", &coordinator)?;

    println!("fetches dispatched: {:?}", coordinator.take_dispatched_fetches());
    Ok(())
}
