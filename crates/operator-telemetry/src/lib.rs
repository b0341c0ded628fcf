// Path: crates/operator-telemetry/src/lib.rs
//! Observability and structured logging for the cross-chain signing
//! operator.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a JSON-formatted `tracing` subscriber driven by `RUST_LOG`
/// (default `info`), and bridges the `log` facade so dependencies that
/// still emit through it show up in the same stream.
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing_log::LogTracer::init()
        .map_err(|e| anyhow::anyhow!("failed to bridge the log facade into tracing: {e}"))?;

    Ok(())
}
