//! Logging setup for binaries and embedding hosts.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,saydali=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=saydali_store=trace` - Also show every storage write
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Returns false if a global subscriber was already installed, which
/// happens when a host application set up its own logging first.
pub fn init_tracing() -> bool {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(rust_log.as_deref()))
        .try_init()
        .is_ok()
}

/// `RUST_LOG` directives when present and parseable, the default otherwise.
fn build_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}
