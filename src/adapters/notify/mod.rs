//! Notification Adapters - Outbound Activity Messages
//!
//! Implements the `Notifier` port. Delivery is best-effort: failures are
//! logged at the adapter level and never surface to the caller.

pub mod telegram;

pub use telegram::TelegramNotifier;
