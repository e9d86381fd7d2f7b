//! Logging setup for the syntaxkit binary
//!
//! The library only emits `tracing` events; installing a subscriber is
//! left to the application. Filtering follows `RUST_LOG`:
//! - `RUST_LOG=debug` - every lookup, loaded source and skipped rule
//! - `RUST_LOG=syntaxkit::syntax::loader=warn` - only rejected rules
//!
//! Output goes to stderr so highlighted text on stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the tracing subscriber (default level `warn`)
pub fn init() {
    init_with_default("warn");
}

/// Initialize the tracing subscriber with a fallback filter used when
/// `RUST_LOG` is unset or invalid
pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
