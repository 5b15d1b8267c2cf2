//! Chain Adapters - EVM Blockchain Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - RPC provider management with a signing wallet
//! - Watched-balance queries (native coin or ERC-20)
//! - Swap submission and receipt-based confirmation

pub mod provider;
pub mod swap_client;

pub use provider::EvmProvider;
pub use swap_client::EvmSwapClient;
