//! Log output setup
//!
//! Logs go to stderr so that answers on stdout stay clean. `RUST_LOG` takes
//! precedence over the level passed on the command line.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();

    if installed.is_ok() {
        tracing::debug!("Logging initialized with level: {}", level);
    }
}
