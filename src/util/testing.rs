//! Logging setup shared by unit and integration tests.

use std::env;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Installs a stderr subscriber once per test binary; `RUST_LOG` selects the level
/// (default `debug`).
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }

    debug!(rust_log = ?env::var("RUST_LOG").ok(), "test logging ready");
}
