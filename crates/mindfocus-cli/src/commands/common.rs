//! Shared helpers for command handlers.

use std::time::Duration;

use mindfocus_core::{BackendClient, Config, Event, FocusContext, Store};

pub type CliError = Box<dyn std::error::Error>;

/// Open the store and load the full application context.
pub fn open_context() -> Result<FocusContext, CliError> {
    let store = Store::open()?;
    let config = Config::load_or_default();
    Ok(FocusContext::load(store, config)?)
}

/// Backend client honoring the configured URL and timeout.
pub fn backend_client(ctx: &FocusContext) -> BackendClient {
    BackendClient::with_timeout(
        &ctx.config().backend_url(),
        Duration::from_secs(ctx.config().backend.timeout_secs.max(1)),
    )
}

pub fn print_event(event: &Event) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn print_events(events: &[Event]) -> Result<(), CliError> {
    for event in events {
        print_event(event)?;
    }
    Ok(())
}

/// Single-threaded runtime for the backend calls; the CLI itself is
/// synchronous.
pub fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?)
}
