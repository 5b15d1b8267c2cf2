//! Configuration Loader - Environment Loading and Validation
//!
//! Reads every key from the environment, applies defaults, validates
//! eagerly, and provides clear error messages for misconfiguration.
//! Validation is fatal at startup by design: a zero cap or a missing
//! token address must never be discovered inside the steady-state loop.

use std::env;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::sizer::DirectionCaps;

use super::{DirectionPolicy, PrivateKey, TelegramConfig, WatchConfig, WatchMode};

/// Default seconds between polls.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Default buy-side base cap (native coin per trade).
const DEFAULT_MAX_BASE: &str = "0.05";

/// Default observed-unit cap (token change per full-size trade).
const DEFAULT_MAX_OBSERVED: &str = "100";

/// Load and validate the configuration from environment variables.
///
/// # Errors
/// Returns a detailed error if a required key is missing, a value fails
/// to parse, or a validation rule is violated.
pub fn load_from_env() -> Result<WatchConfig> {
  let watch_mode = match optional("WATCH_MODE").as_deref() {
    None | Some("TOKEN") => WatchMode::Token,
    Some("ETH") => WatchMode::Eth,
    Some(other) => bail!("WATCH_MODE must be ETH or TOKEN, got {other}"),
  };

  let token_address = optional("TOKEN_ADDRESS")
    .map(|v| {
      v.parse::<Address>()
        .with_context(|| format!("TOKEN_ADDRESS is not a valid address: {v}"))
    })
    .transpose()?;

  let poll_secs = optional("POLL_INTERVAL")
    .map(|v| {
      v.parse::<u64>()
        .with_context(|| format!("POLL_INTERVAL must be an integer number of seconds, got {v}"))
    })
    .transpose()?
    .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

  let telegram = match (optional("TELEGRAM_BOT_TOKEN"), optional("TELEGRAM_CHAT_ID")) {
    (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
    _ => None,
  };

  let config = WatchConfig {
    rpc_url: required("RPC_URL")?,
    private_key: PrivateKey::new(required("PRIVATE_KEY")?),
    contract_address: address(&required("CONTRACT_ADDRESS")?, "CONTRACT_ADDRESS")?,
    target_wallet: address(&required("TARGET_WALLET")?, "TARGET_WALLET")?,
    watch_mode,
    token_address,
    poll_interval: Duration::from_secs(poll_secs),
    buy: DirectionPolicy {
      enabled: flag("ENABLE_BUY"),
      caps: DirectionCaps {
        max_observed: decimal_or("MAX_TOKEN_CHANGE", DEFAULT_MAX_OBSERVED)?,
        max_base: decimal_or("MAX_ETH_PER_TRADE", DEFAULT_MAX_BASE)?,
      },
    },
    sell: DirectionPolicy {
      enabled: flag("ENABLE_SELL"),
      caps: DirectionCaps {
        max_observed: decimal_or("MAX_TOKEN_SELL", DEFAULT_MAX_OBSERVED)?,
        max_base: decimal_or("MAX_ETH_PER_SELL", DEFAULT_MAX_BASE)?,
      },
    },
    min_amount_out: U256::ONE,
    telegram,
    log_filter: optional("LOG_FILTER").unwrap_or_else(|| "info".to_string()),
    health_port: optional("HEALTH_PORT")
      .map(|v| {
        v.parse::<u16>()
          .with_context(|| format!("HEALTH_PORT must be a port number, got {v}"))
      })
      .transpose()?
      .unwrap_or(8080),
  };

  validate_config(&config)?;

  info!(
    mode = ?config.watch_mode,
    target = %config.target_wallet,
    interval_secs = poll_secs,
    buy_enabled = config.buy.enabled,
    sell_enabled = config.sell.enabled,
    notifications = config.telegram.is_some(),
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Strictly positive poll interval and caps (a zero observed-unit cap
///   would be a division by zero inside the sizer)
/// - Token address present when watching a token balance or when the
///   sell direction is enabled
pub fn validate_config(config: &WatchConfig) -> Result<()> {
  anyhow::ensure!(!config.rpc_url.is_empty(), "RPC_URL must not be empty");
  anyhow::ensure!(
    config.poll_interval > Duration::ZERO,
    "POLL_INTERVAL must be greater than zero"
  );

  if config.watch_mode == WatchMode::Token {
    anyhow::ensure!(
      config.token_address.is_some(),
      "TOKEN_ADDRESS is required when WATCH_MODE is TOKEN"
    );
  }

  // Sells send the token to the swap contract, so the address is needed
  // even when the watched balance is native ETH.
  if config.sell.enabled {
    anyhow::ensure!(
      config.token_address.is_some(),
      "TOKEN_ADDRESS is required when ENABLE_SELL is true"
    );
  }

  for (direction, policy, observed_key, base_key) in [
    ("buy", &config.buy, "MAX_TOKEN_CHANGE", "MAX_ETH_PER_TRADE"),
    ("sell", &config.sell, "MAX_TOKEN_SELL", "MAX_ETH_PER_SELL"),
  ] {
    anyhow::ensure!(
      policy.caps.max_observed > Decimal::ZERO,
      "{observed_key} must be positive, got {} ({direction} cap)",
      policy.caps.max_observed
    );
    anyhow::ensure!(
      policy.caps.max_base > Decimal::ZERO,
      "{base_key} must be positive, got {} ({direction} cap)",
      policy.caps.max_base
    );
  }

  Ok(())
}

fn required(key: &str) -> Result<String> {
  env::var(key).with_context(|| format!("{key} must be set"))
}

fn optional(key: &str) -> Option<String> {
  env::var(key).ok().filter(|v| !v.is_empty())
}

/// The literal string "true" enables a direction; anything else (or an
/// unset key) leaves it disabled.
fn flag(key: &str) -> bool {
  env::var(key).is_ok_and(|v| v == "true")
}

fn decimal_or(key: &str, default: &str) -> Result<Decimal> {
  let value = optional(key).unwrap_or_else(|| default.to_string());
  value
    .parse::<Decimal>()
    .with_context(|| format!("{key} must be a decimal number, got {value}"))
}

fn address(value: &str, key: &str) -> Result<Address> {
  value
    .parse::<Address>()
    .with_context(|| format!("{key} is not a valid address: {value}"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn base_config() -> WatchConfig {
    WatchConfig {
      rpc_url: "http://localhost:8545".to_string(),
      private_key: PrivateKey::new("0xkey".to_string()),
      contract_address: Address::ZERO,
      target_wallet: Address::ZERO,
      watch_mode: WatchMode::Token,
      token_address: Some(Address::ZERO),
      poll_interval: Duration::from_secs(30),
      buy: DirectionPolicy {
        enabled: true,
        caps: DirectionCaps {
          max_observed: dec!(100),
          max_base: dec!(0.05),
        },
      },
      sell: DirectionPolicy {
        enabled: false,
        caps: DirectionCaps {
          max_observed: dec!(100),
          max_base: dec!(0.05),
        },
      },
      min_amount_out: U256::ONE,
      telegram: None,
      log_filter: "info".to_string(),
      health_port: 8080,
    }
  }

  #[test]
  fn test_valid_config_passes() {
    assert!(validate_config(&base_config()).is_ok());
  }

  #[test]
  fn test_zero_observed_cap_rejected() {
    let mut config = base_config();
    config.buy.caps.max_observed = Decimal::ZERO;
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("MAX_TOKEN_CHANGE"));
  }

  #[test]
  fn test_zero_base_cap_rejected() {
    let mut config = base_config();
    config.sell.caps.max_base = Decimal::ZERO;
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("MAX_ETH_PER_SELL"));
  }

  #[test]
  fn test_token_mode_requires_token_address() {
    let mut config = base_config();
    config.token_address = None;
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("TOKEN_ADDRESS"));
  }

  #[test]
  fn test_eth_mode_needs_no_token_address() {
    let mut config = base_config();
    config.watch_mode = WatchMode::Eth;
    config.token_address = None;
    assert!(validate_config(&config).is_ok());
  }

  #[test]
  fn test_sell_requires_token_address_even_in_eth_mode() {
    // ETH mode alone waives the token address, but a sell has nothing
    // to transfer without one.
    let mut config = base_config();
    config.watch_mode = WatchMode::Eth;
    config.token_address = None;
    config.sell.enabled = true;
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("ENABLE_SELL"));
  }

  #[test]
  fn test_zero_poll_interval_rejected() {
    let mut config = base_config();
    config.poll_interval = Duration::ZERO;
    assert!(validate_config(&config).is_err());
  }

  #[test]
  fn test_private_key_debug_is_redacted() {
    let key = PrivateKey::new("0xdeadbeef".to_string());
    let rendered = format!("{key:?}");
    assert!(!rendered.contains("deadbeef"));
  }
}
