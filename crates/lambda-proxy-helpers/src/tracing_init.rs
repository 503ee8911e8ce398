//! Tracing initialization for Lambda handlers.
//!
//! Configures JSON-formatted output suitable for CloudWatch Logs. Replaces
//! the usual "set a global logger level at import time" pattern with an
//! explicit, once-per-process call from the handler's `main`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with JSON formatting for CloudWatch Logs.
///
/// Call once at the start of the Lambda `main` function, before handing
/// control to the runtime. The log level is controlled via the `RUST_LOG`
/// environment variable and defaults to `info`.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_level(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
