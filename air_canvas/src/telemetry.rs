//! Logging setup for the binaries that drive the pipeline.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Environment variable read before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "AIR_CANVAS_LOG";

/// Installs a console subscriber.
///
/// The filter comes from `AIR_CANVAS_LOG`, then `RUST_LOG`, then `default_level`.
/// Fails if a global subscriber is already set.
pub fn init_logging(default_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt::layer().with_target(true))
        .try_init()?;
    Ok(())
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}
