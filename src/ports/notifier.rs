//! Notifier Port - Best-effort Activity Side-channel
//!
//! Outbound notifications are fire-and-forget: the contract is
//! "delivery was attempted", nothing more. `notify` therefore returns
//! nothing — callers never branch on its outcome, and a broken
//! notification channel must never fail a poll cycle. Implementors log
//! delivery failures themselves.

use async_trait::async_trait;

/// Trait for best-effort outbound notifications.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
  /// Attempt to deliver a plain-text message.
  async fn notify(&self, text: &str);
}
