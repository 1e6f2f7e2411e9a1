//! Tracing subscriber setup for binaries

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging at `level`.
///
/// Use `RUST_LOG` environment variable to override the default filter.
/// Calling this more than once is harmless.
pub fn init_logging(level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
    });

    if fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
