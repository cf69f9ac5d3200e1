//! Log output for binaries embedding Arcgate.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` (e.g. `"info,arcgate=debug"`) when it is unset or
/// invalid.
///
/// Returns `false` if a global subscriber was already installed; calling
/// this twice is harmless.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).try_init().is_ok()
}
