//! # Sortic Hub
//!
//! Entry point for the sorting-unit coordination process. Wires the
//! communication controller to the in-memory gateway adapters and drives
//! one FSM pass per scheduler tick until interrupted.

use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sortic_comm::CommunicationService;
use sortic_runtime::{CommandBus, MemoryBroker, RuntimeConfig, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RuntimeConfig::from_env();
    info!(unit = %config.unit, tick_ms = config.tick_ms, "Starting Sortic hub");

    let (bus, _bus_handle) = CommandBus::new();
    let (broker, _broker_handle) = MemoryBroker::new();
    let mut service = CommunicationService::new(
        config.unit,
        config.timings,
        Box::new(SystemClock::new()),
        bus,
        broker,
    );

    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_ms));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = service.tick() {
                    // Gateway failures are transient; keep scheduling passes.
                    error!(%err, state = ?service.state(), "Controller pass failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!(state = ?service.state(), "Sortic hub stopped");
    Ok(())
}
