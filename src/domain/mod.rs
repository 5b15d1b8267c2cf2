//! Domain layer - Core mirroring logic and models.
//!
//! This module contains the pure domain logic for the balance mirror bot.
//! No external dependencies allowed here (hexagonal architecture inner ring).
//! All types are serializable and testable in isolation.

pub mod amount;
pub mod sizer;
pub mod trade;

// Re-export core types for convenience
pub use amount::AmountError;
pub use sizer::{DirectionCaps, SizedTrade, SizerError, TradeSizer};
pub use trade::{BalanceDelta, TradeIntent, TradeSide};
