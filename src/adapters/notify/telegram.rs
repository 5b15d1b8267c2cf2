//! Telegram Notifier - HTTP Delivery of Activity Messages
//!
//! Sends messages through the Telegram Bot API `sendMessage` endpoint.
//! When credentials are absent the notifier is constructed in disabled
//! mode and every `notify` call is a silent no-op. Send failures are
//! logged and swallowed; a broken Telegram channel must never fail a
//! poll cycle.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::config::TelegramConfig;
use crate::ports::notifier::Notifier;

/// Request timeout for the Telegram API.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram API response envelope, parsed only to log rejections.
#[derive(Debug, Deserialize)]
struct ApiResponse {
  ok: bool,
  #[serde(default)]
  description: Option<String>,
}

/// A configured delivery channel.
struct Channel {
  http: Client,
  /// Full sendMessage URL including the bot token. Never logged.
  url: String,
  chat_id: String,
}

/// Telegram-backed implementation of the `Notifier` port.
pub struct TelegramNotifier {
  channel: Option<Channel>,
}

impl TelegramNotifier {
  /// Build the notifier. `None` credentials produce a disabled notifier
  /// whose `notify` does nothing.
  pub fn new(config: Option<&TelegramConfig>) -> Result<Self> {
    let Some(config) = config else {
      info!("Telegram credentials absent — notifications disabled");
      return Ok(Self { channel: None });
    };

    let http = Client::builder()
      .timeout(SEND_TIMEOUT)
      .build()
      .context("Failed to build HTTP client")?;

    info!(chat_id = %config.chat_id, "Telegram notifications enabled");

    Ok(Self {
      channel: Some(Channel {
        http,
        url: format!(
          "https://api.telegram.org/bot{}/sendMessage",
          config.bot_token
        ),
        chat_id: config.chat_id.clone(),
      }),
    })
  }

  /// Whether a delivery channel is configured.
  pub fn is_enabled(&self) -> bool {
    self.channel.is_some()
  }
}

#[async_trait]
impl Notifier for TelegramNotifier {
  async fn notify(&self, text: &str) {
    let Some(channel) = &self.channel else {
      return;
    };

    // reqwest query encoding handles the message text URL-encoding.
    let result = channel
      .http
      .get(&channel.url)
      .query(&[("chat_id", channel.chat_id.as_str()), ("text", text)])
      .send()
      .await;

    match result {
      Ok(response) => {
        let status = response.status();
        match response.json::<ApiResponse>().await {
          Ok(api) if api.ok => {
            debug!(chars = text.len(), "Notification delivered");
          }
          Ok(api) => {
            error!(
              %status,
              description = api.description.as_deref().unwrap_or("none"),
              "Telegram API rejected notification"
            );
          }
          Err(e) => {
            error!(%status, error = %e, "Unreadable Telegram API response");
          }
        }
      }
      Err(e) => {
        error!(error = %e, "Telegram notification failed");
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_disabled_notifier_is_a_noop() {
    let notifier = TelegramNotifier::new(None).unwrap();
    assert!(!notifier.is_enabled());
    // Must not panic or attempt network I/O.
    notifier.notify("hello").await;
  }

  #[test]
  fn test_enabled_notifier_reports_enabled() {
    let config = TelegramConfig {
      bot_token: "123:abc".to_string(),
      chat_id: "42".to_string(),
    };
    let notifier = TelegramNotifier::new(Some(&config)).unwrap();
    assert!(notifier.is_enabled());
  }
}
