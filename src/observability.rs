//! Tracing subscriber setup

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber
///
/// Honors `RUST_LOG`, defaulting to `info`. Call once at process start;
/// a second call fails.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
