//! Relay Broker - Main Entry Point

mod settings;
mod telemetry;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::DaemonConfig;
use relay_api_rpc::RpcServer;
use relay_core::Broker;
use relay_infra_http::HttpCallbackSender;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_FILE_PREFIX: &str = "relay-broker.log";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (guard flushes the file writer on exit)
    let _log_guard = init_logging()?;

    info!("Relay Broker v{} starting...", VERSION);

    if let Some(endpoint) = telemetry::endpoint() {
        if telemetry::enabled() {
            info!(endpoint = %endpoint, "OpenTelemetry export enabled");
        } else {
            warn!("OpenTelemetry endpoint set but feature 'telemetry' not enabled");
            warn!("Rebuild with: cargo build --features telemetry");
        }
    }

    // 2. Load configuration
    let config = DaemonConfig::load().context("failed to load configuration")?;
    info!(
        queues = ?config.queue_names,
        rpc_host = %config.rpc_host,
        rpc_port = config.rpc_port,
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let sender = Arc::new(HttpCallbackSender::new());
    let broker = Arc::new(
        Broker::start(config.broker(), sender).context("invalid broker configuration")?,
    );

    // 4. Start JSON-RPC server
    let rpc_server = RpcServer::new(config.rpc(), Arc::clone(&broker));
    let (rpc_handle, rpc_addr) = rpc_server
        .start()
        .await
        .context("RPC server start failed")?;

    info!(addr = %rpc_addr, "System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Stop accepting requests, then drop the broker (aborts the dispatcher)
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;
    drop(broker);

    info!("Shutdown complete.");

    Ok(())
}

/// Install the global subscriber.
///
/// - `RUST_LOG` overrides the default `relay=info` filter
/// - `RELAY_LOG_FORMAT=json` for structured output, pretty otherwise
/// - `RELAY_LOG_DIR` adds a daily-rolling JSON file
fn init_logging() -> Result<Option<WorkerGuard>> {
    let log_format = std::env::var("RELAY_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("relay=info"))
        .context("failed to create env filter")?;

    let (file_layer, guard) = match std::env::var("RELAY_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(telemetry::layer()?)
        .with(env_filter)
        .with(file_layer);

    match log_format.as_str() {
        "json" => registry.with(fmt::layer().json()).init(),
        _ => registry.with(fmt::layer().pretty()).init(),
    }

    Ok(guard)
}
