//! Balance Mirror Bot — Entry Point
//!
//! Initializes configuration, logging, the chain connection, and the
//! mirror engine. Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load .env + environment config + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create Telegram notifier (disabled if credentials absent)
//! 4. Connect RPC provider with signing wallet
//! 5. Create swap client and validate contracts on-chain
//! 6. Fetch the initial balance snapshot (fatal if unreachable —
//!    there is no meaningful "watching nothing" state)
//! 7. Spawn health server (/live + /ready)
//! 8. Run the mirror loop until SIGINT → graceful shutdown

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::{broadcast, watch};
use tracing::{error, info};

mod adapters;
mod config;
mod domain;
mod ports;
mod usecases;

use adapters::chain::{EvmProvider, EvmSwapClient};
use adapters::notify::TelegramNotifier;
use ports::chain_client::ChainClient;
use usecases::mirror_engine::MirrorEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration from the environment ──────────
    dotenv::dotenv().ok();
    let config = config::loader::load_from_env().context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .json()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = ?config.watch_mode,
        target = %config.target_wallet,
        interval_secs = config.poll_interval.as_secs(),
        "Starting balance mirror bot"
    );

    // ── 3. Shutdown signal channels ─────────────────────────
    let (shutdown_tx, _shutdown_rx) = broadcast::channel::<()>(1);
    let (health_tx, health_rx) = watch::channel(true);

    // ── 4. Create notifier (no-op without credentials) ──────
    let notifier =
        Arc::new(TelegramNotifier::new(config.telegram.as_ref()).context("Failed to create notifier")?);

    // ── 5. Connect RPC provider with signing wallet ─────────
    let provider = Arc::new(
        EvmProvider::connect(&config)
            .await
            .context("Failed to connect to RPC")?,
    );

    // ── 6. Create swap client, validate contracts on-chain ──
    let chain = Arc::new(
        EvmSwapClient::new(Arc::clone(&provider), &config)
            .await
            .context("Failed to create swap client")?,
    );

    // ── 7. Initial balance snapshot — fatal if unreachable ──
    let initial_balance = chain
        .watched_balance()
        .await
        .context("Initial balance query failed — nothing to watch")?;

    info!(
        balance = %initial_balance,
        mode = ?config.watch_mode,
        target = %config.target_wallet,
        "Watching balance"
    );

    // ── 8. Spawn health server ──────────────────────────────
    let health_port = config.health_port;
    let health_handle = tokio::spawn(async move {
        if let Err(e) = adapters::health::serve_health(health_port, health_rx).await {
            error!(error = %e, "Health server failed");
        }
    });

    // ── 9. Spawn the mirror engine ──────────────────────────
    let mut engine = MirrorEngine::new(
        Arc::clone(&chain),
        Arc::clone(&notifier),
        &config,
        initial_balance,
        shutdown_tx.subscribe(),
    );
    let engine_handle = tokio::spawn(async move {
        if let Err(e) = engine.run().await {
            error!(error = %e, "Mirror engine failed");
        }
    });

    info!("All tasks spawned — bot is running");

    // ── 10. Wait for SIGINT ─────────────────────────────────
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, initiating graceful shutdown");
        }
    }

    // ── Graceful shutdown ───────────────────────────────────

    // 1. Signal the engine to stop after any in-flight cycle
    let _ = shutdown_tx.send(());

    // 2. Mark readiness probe unhealthy (→ 503)
    let _ = health_tx.send(false);

    // 3. Wait for the engine to finish its current cycle (up to 30s)
    info!("Waiting for engine shutdown...");
    let _ = tokio::time::timeout(std::time::Duration::from_secs(30), engine_handle).await;

    // 4. Stop health server
    health_handle.abort();

    info!("Shutdown complete");
    Ok(())
}
