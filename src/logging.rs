use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "TILL_LOG";

const DEFAULT_LEVEL: &str = "warn,sqlx=warn";

/// Install the global tracing subscriber. Logs go to stderr so report output
/// on stdout can be piped. Level comes from `TILL_LOG` (EnvFilter syntax).
pub fn init() {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL));

    // A second init (tests, re-entry) is harmless; ignore the error.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
