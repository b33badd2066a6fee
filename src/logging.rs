//! Logging init for harnesses and tests.

use tracing_subscriber::EnvFilter;

/// Initialize tracing output to stderr, honoring `RUST_LOG` with a
/// `info,redial=debug` fallback. Safe to call more than once; later calls
/// are no-ops.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,redial=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
