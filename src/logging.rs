//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies. Logs
//! go to stderr so command output on stdout stays machine readable.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Returns false if one was already set.
pub fn init_logging(default_level: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
