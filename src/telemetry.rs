// src/telemetry.rs
//! Tracing subscriber bootstrap

use crate::config::LoggingSettings;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter directive in effect: `RUST_LOG` wins over the configured filter
pub fn filter_directive(settings: &LoggingSettings) -> String {
    std::env::var("RUST_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| settings.filter.clone())
}

/// Install the global subscriber; logs go to stderr so stdout stays data-only.
/// Returns false when a subscriber was already installed.
pub fn init_tracing(settings: &LoggingSettings) -> bool {
    let filter = EnvFilter::try_new(filter_directive(settings))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::constants::logging::DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
