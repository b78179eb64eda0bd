//! Tracing subscriber setup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Builds the log filter: `RUST_LOG` if set and valid, else `configured`,
/// else `info`.
fn filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Logs go to stderr so stdout carries only
/// command output.
pub fn init(configured: &str) {
    tracing_subscriber::registry()
        .with(filter(configured))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
