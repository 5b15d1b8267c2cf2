//! Configuration Module - Environment-based Bot Configuration
//!
//! Loads and validates the operating parameters from environment
//! variables (with `.env` support via dotenv). The resulting
//! [`WatchConfig`] is an immutable snapshot created once at startup;
//! nothing re-reads the environment after that. All addresses and caps
//! are externalized here - nothing is hardcoded in the domain layer.

pub mod loader;

use std::time::Duration;

use alloy::primitives::{Address, U256};

use crate::domain::sizer::DirectionCaps;

/// Which balance of the target account is watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchMode {
  /// The chain's native coin balance.
  Eth,
  /// An ERC-20 token balance (requires `token_address`).
  Token,
}

/// Signing key wrapper that keeps the key out of Debug output and logs.
#[derive(Clone)]
pub struct PrivateKey(String);

impl PrivateKey {
  pub fn new(key: String) -> Self {
    Self(key)
  }

  /// Access the raw key material. Only the signer construction path
  /// should call this.
  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Debug for PrivateKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("PrivateKey(<redacted>)")
  }
}

/// Telegram notification channel credentials.
#[derive(Clone)]
pub struct TelegramConfig {
  /// Bot API token (secret, redacted in Debug).
  pub bot_token: String,
  /// Destination chat ID.
  pub chat_id: String,
}

impl std::fmt::Debug for TelegramConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TelegramConfig")
      .field("bot_token", &"<redacted>")
      .field("chat_id", &self.chat_id)
      .finish()
  }
}

/// Mirroring policy for one trade direction.
#[derive(Debug, Clone, Copy)]
pub struct DirectionPolicy {
  /// Whether this direction is mirrored at all. Detection still
  /// advances the balance snapshot when disabled.
  pub enabled: bool,
  /// Proportional sizing caps.
  pub caps: DirectionCaps,
}

/// Immutable snapshot of all operating parameters.
///
/// Created once by [`loader::load_from_env`] and never mutated.
#[derive(Debug, Clone)]
pub struct WatchConfig {
  /// Chain RPC endpoint.
  pub rpc_url: String,
  /// Signer key for submitting swaps.
  pub private_key: PrivateKey,
  /// Swap contract address.
  pub contract_address: Address,
  /// Account whose balance is watched.
  pub target_wallet: Address,
  /// Native coin or token balance.
  pub watch_mode: WatchMode,
  /// Token contract, present iff `watch_mode` is `Token`.
  pub token_address: Option<Address>,
  /// Fixed interval between polls.
  pub poll_interval: Duration,
  /// Buy-side mirroring policy.
  pub buy: DirectionPolicy,
  /// Sell-side mirroring policy.
  pub sell: DirectionPolicy,
  /// Minimum acceptable swap output. Currently a placeholder slippage
  /// floor of one raw unit on both paths.
  pub min_amount_out: U256,
  /// Notification channel; `None` disables notifications silently.
  pub telegram: Option<TelegramConfig>,
  /// Default tracing filter when RUST_LOG is unset.
  pub log_filter: String,
  /// Bind port for the liveness/readiness probes.
  pub health_port: u16,
}
