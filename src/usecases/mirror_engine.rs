//! Mirror Engine - Core Polling and Trade-Mirroring Loop
//!
//! The main use case that:
//! 1. Polls the watched balance on a fixed interval
//! 2. Diffs it against the last-known snapshot
//! 3. Classifies the delta as inflow (buy) or outflow (sell)
//! 4. Sizes the mirrored trade proportionally to the configured caps
//! 5. Submits the swap and awaits confirmation
//!
//! The engine is the sole owner of the last-known balance. A cycle
//! either commits its new snapshot or, on a balance-query error, leaves
//! the previous one untouched so the same delta is recomputed on the
//! next tick. Trade execution errors do NOT roll the snapshot back:
//! the triggering balance change already happened on-chain regardless
//! of mirror success, so a failed trade is reported and dropped rather
//! than retried (fire-and-forget, per configuration of the original
//! deployment).
//!
//! Scheduling: `tokio::time::interval` with `MissedTickBehavior::Delay`,
//! awaited in the same task as the cycle body. At most one cycle is ever
//! in flight; a tick that would fire mid-cycle is deferred until the
//! cycle finishes, never run concurrently and never stacked more than
//! one deep.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use crate::config::WatchConfig;
use crate::domain::sizer::TradeSizer;
use crate::domain::trade::{BalanceDelta, TradeIntent, TradeSide};
use crate::ports::chain_client::ChainClient;
use crate::ports::notifier::Notifier;

/// Mirror engine orchestrating the full poll/diff/mirror loop.
pub struct MirrorEngine<C: ChainClient, N: Notifier> {
  /// Chain adapter for balance queries and swap execution.
  chain: Arc<C>,
  /// Best-effort notification channel.
  notifier: Arc<N>,
  /// Proportional trade sizer.
  sizer: TradeSizer,
  /// Whether inflows are mirrored as buys.
  buy_enabled: bool,
  /// Whether outflows are mirrored as sells.
  sell_enabled: bool,
  /// Fixed interval between polls.
  poll_interval: Duration,
  /// The single authoritative last-known balance snapshot.
  last_balance: U256,
  /// Shutdown signal receiver.
  shutdown_rx: broadcast::Receiver<()>,
}

impl<C: ChainClient, N: Notifier> MirrorEngine<C, N> {
  /// Create an engine seeded with the initial balance snapshot.
  ///
  /// The caller fetches the initial balance before construction; a bot
  /// that cannot read the watched balance at startup has nothing to
  /// watch and must fail fatally instead.
  pub fn new(
    chain: Arc<C>,
    notifier: Arc<N>,
    config: &WatchConfig,
    initial_balance: U256,
    shutdown_rx: broadcast::Receiver<()>,
  ) -> Self {
    Self {
      chain,
      notifier,
      sizer: TradeSizer::new(config.buy.caps, config.sell.caps),
      buy_enabled: config.buy.enabled,
      sell_enabled: config.sell.enabled,
      poll_interval: config.poll_interval,
      last_balance: initial_balance,
      shutdown_rx,
    }
  }

  /// The current last-known balance snapshot.
  pub fn last_balance(&self) -> U256 {
    self.last_balance
  }

  /// Run the polling loop until a shutdown signal arrives.
  ///
  /// Per-cycle errors are contained here: logged, notified, and the
  /// loop keeps running with its previous snapshot. Only shutdown ends
  /// the loop.
  #[instrument(skip(self), name = "mirror_loop")]
  pub async fn run(&mut self) -> Result<()> {
    info!(
      interval_secs = self.poll_interval.as_secs(),
      buy_enabled = self.buy_enabled,
      sell_enabled = self.sell_enabled,
      "Mirror loop started"
    );

    let mut ticker = tokio::time::interval(self.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately; consume
    // it so the first poll happens one full interval after startup.
    ticker.tick().await;

    loop {
      tokio::select! {
        biased;
        _ = self.shutdown_rx.recv() => {
          info!("Mirror loop received shutdown signal");
          break;
        }
        _ = ticker.tick() => {
          if let Err(e) = self.poll_cycle().await {
            warn!(error = %e, "Poll cycle failed, snapshot retained");
            self.notifier.notify(&format!("Bot error: {e:#}")).await;
          }
        }
      }
    }

    info!("Mirror loop stopped cleanly");
    Ok(())
  }

  /// Execute one poll cycle.
  ///
  /// Public so tests and embedders can drive cycles without the timer.
  ///
  /// # Errors
  /// Only the balance query can fail this function; the snapshot is
  /// then left untouched. Execution errors are contained in
  /// [`Self::mirror`] after the snapshot has already advanced.
  #[instrument(skip(self), name = "poll_cycle", fields(last = %self.last_balance))]
  pub async fn poll_cycle(&mut self) -> Result<()> {
    let current = self
      .chain
      .watched_balance()
      .await
      .context("Balance query failed")?;

    match BalanceDelta::between(self.last_balance, current) {
      BalanceDelta::Unchanged => {
        debug!(balance = %current, "No change");
      }
      BalanceDelta::Inflow(amount) => {
        info!(inflow = %amount, balance = %current, "Detected balance increase");
        self.last_balance = current;
        self.mirror(TradeSide::Buy, amount).await;
      }
      BalanceDelta::Outflow(amount) => {
        info!(outflow = %amount, balance = %current, "Detected balance decrease");
        self.last_balance = current;
        self.mirror(TradeSide::Sell, amount).await;
      }
    }

    Ok(())
  }

  /// Size and execute one mirrored trade. All errors are contained:
  /// by the time this runs the snapshot has advanced, and a failed
  /// mirror only produces a log line and a notification.
  async fn mirror(&self, side: TradeSide, observed: U256) {
    let enabled = match side {
      TradeSide::Buy => self.buy_enabled,
      TradeSide::Sell => self.sell_enabled,
    };
    if !enabled {
      debug!(%side, "Mirroring disabled for this direction, skipping");
      return;
    }

    let sized = match side {
      TradeSide::Buy => self.sizer.size_buy(observed),
      TradeSide::Sell => self.sizer.size_sell(observed),
    };
    let sized = match sized {
      Ok(s) => s,
      Err(e) => {
        error!(error = %e, %side, observed = %observed, "Trade sizing failed");
        self.notifier.notify(&format!("Bot error: {e}")).await;
        return;
      }
    };

    if sized.proportion > Decimal::ONE {
      warn!(
        proportion = %sized.proportion,
        %side,
        "Observed change exceeds the configured cap, mirrored trade is oversized"
      );
    }

    let intent = TradeIntent::new(side, &sized);
    info!(
      intent_id = %intent.id,
      amount = %intent.amount_decimal,
      amount_raw = %intent.amount,
      %side,
      "Mirroring trade"
    );
    self.notifier.notify(&intent.summary()).await;

    if let Err(e) = self.execute(&intent).await {
      error!(error = %e, intent_id = %intent.id, %side, "Trade execution failed");
      self
        .notifier
        .notify(&format!("{side} failed: {e:#}"))
        .await;
    }
  }

  /// Submit the swap and wait for its confirmation.
  async fn execute(&self, intent: &TradeIntent) -> Result<()> {
    let pending = self
      .chain
      .submit_swap(intent)
      .await
      .context("Swap submission failed")?;

    info!(tx_hash = %pending.tx_hash, intent_id = %intent.id, "Swap submitted");
    self
      .notifier
      .notify(&format!("{} TX sent: {}", intent.side, pending.tx_hash))
      .await;

    let outcome = self
      .chain
      .await_confirmation(&pending)
      .await
      .context("Confirmation failed")?;

    anyhow::ensure!(
      outcome.confirmed,
      "transaction {} reverted on-chain",
      outcome.tx_hash
    );

    info!(
      tx_hash = %outcome.tx_hash,
      block = ?outcome.block_number,
      intent_id = %intent.id,
      "Swap confirmed"
    );
    self
      .notifier
      .notify(&format!("{} confirmed: {}", intent.side, outcome.tx_hash))
      .await;

    Ok(())
  }
}
