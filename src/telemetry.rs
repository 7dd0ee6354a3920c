//! Logging setup.
//!
//! Installs a `tracing-subscriber` formatter writing to stderr. `RUST_LOG`
//! takes precedence over the configured filter.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Returns `false` if one was already set.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
