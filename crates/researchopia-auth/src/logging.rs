//! Log output setup for binaries built on the auth core.
//!
//! Libraries in this workspace only emit through the `tracing` facade. A
//! host application calls [`init`] once at startup to see the output.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, or by
/// `default_filter` when `RUST_LOG` is unset or unparsable.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes. Calling it twice is harmless.
pub fn init(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
