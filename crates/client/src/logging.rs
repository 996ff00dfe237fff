//! Tracing setup for the simulator binary.
use anyhow::{Result, anyhow};

/// Installs a stderr subscriber filtered by `RUST_LOG` (INFO when unset).
///
/// Stdout is left to the event transcript.
pub fn setup_logging() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}
