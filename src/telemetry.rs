//! Tracing subscriber setup for binaries.
//!
//! The library only emits `tracing` events; installing a subscriber is
//! left to the application.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber: compact output, `RUST_LOG` filtering,
/// `info` by default.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();
}
