//! Logging setup for the binary

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Install a stderr fmt subscriber filtered by `RUST_LOG`
///
/// Logs go to stderr so they never interleave with console prompts on
/// stdout. Calling this twice is harmless; the second call is ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
