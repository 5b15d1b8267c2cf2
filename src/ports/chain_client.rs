//! Chain Client Port - On-chain Interaction Interface
//!
//! Defines the trait the mirror engine uses to read the watched balance
//! and to execute mirrored swaps. Implemented against an EVM chain via
//! alloy-rs; mocked in tests.

use alloy::primitives::U256;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::trade::TradeIntent;

/// Handle for a submitted but not yet confirmed swap.
#[derive(Debug, Clone)]
pub struct PendingSwap {
  /// Transaction hash as returned by the node.
  pub tx_hash: String,
  /// Submission timestamp.
  pub submitted_at: DateTime<Utc>,
}

/// Final outcome of a mirrored swap. Used for logging and notification
/// only; nothing is persisted.
#[derive(Debug, Clone)]
pub struct SwapOutcome {
  /// Transaction hash.
  pub tx_hash: String,
  /// Whether the transaction succeeded on-chain.
  pub confirmed: bool,
  /// Block the transaction was mined in, if known.
  pub block_number: Option<u64>,
  /// When confirmation was observed.
  pub confirmed_at: DateTime<Utc>,
}

/// Trait for on-chain interactions.
///
/// One implementor per watched account: the target address, watch mode,
/// and swap contract are fixed at construction, so the engine only ever
/// asks for "the" balance.
#[async_trait]
pub trait ChainClient: Send + Sync + 'static {
  /// Query the current balance of the watched account, in raw units.
  async fn watched_balance(&self) -> anyhow::Result<U256>;

  /// Submit the swap described by the intent.
  ///
  /// Buy intents spend `intent.amount` of the base coin through the
  /// payable swap entry point; sell intents pass `intent.amount` of the
  /// token to the sell entry point.
  async fn submit_swap(&self, intent: &TradeIntent) -> anyhow::Result<PendingSwap>;

  /// Wait for the submitted swap to be mined.
  ///
  /// # Errors
  /// Returns an error if the receipt cannot be fetched or the
  /// confirmation wait times out.
  async fn await_confirmation(&self, pending: &PendingSwap) -> anyhow::Result<SwapOutcome>;

  /// Check if the chain connection is healthy.
  async fn is_healthy(&self) -> bool;
}
