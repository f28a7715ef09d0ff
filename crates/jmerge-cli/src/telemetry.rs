//! Logging initialization.
//!
//! Controlled by `JMERGE_LOG_FORMAT`:
//! - unset or `"text"` → human-readable events to stderr
//! - `"json"` → JSON spans/events to stderr
//!
//! Verbosity follows `RUST_LOG` and defaults to `warn`, so normal runs only
//! print the command's own output.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "JMERGE_LOG_FORMAT";

/// Install the global subscriber. Call once, at the top of `main()`.
pub fn init() {
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json { init_json() } else { init_text() }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_text() {
    tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// JSON spans/events to stderr via tracing-subscriber's JSON formatter.
fn init_json() {
    tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE),
        )
        .init();
}
