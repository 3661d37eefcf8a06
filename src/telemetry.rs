//! Tracing setup for the server binary.
//!
//! `RUST_LOG` controls the filter; without it everything at `info` and above
//! is printed.

use tracing_subscriber::EnvFilter;

/// Installs a compact fmt subscriber. Returns an error if one is already set.
pub fn init_tracing(debug: bool) -> Result<(), String> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| err.to_string())
}
