//! Structured logging configuration.
//!
//! Provides setup for observability using the `tracing` crate with:
//! - Structured logging with JSON output option
//! - Configurable log levels via flag or `RUST_LOG`

use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Registry,
};

/// Initialize tracing with the given configuration.
///
/// Sets up the tracing subscriber with the configured log level (the
/// `RUST_LOG` environment variable takes precedence) and either plain
/// text or JSON output.
///
/// # Panics
///
/// Panics if a tracing subscriber has already been initialized in this
/// process.
pub fn init_tracing(level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        let json_layer = fmt::layer().json().with_target(true);
        Registry::default().with(env_filter).with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer().with_target(true);
        Registry::default().with(env_filter).with(fmt_layer).init();
    }

    tracing::debug!("Tracing initialized: level={}, json={}", level, json);
}
