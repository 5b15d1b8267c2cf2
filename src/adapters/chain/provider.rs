//! RPC Provider - alloy-rs 0.9 Connection Management
//!
//! Manages the connection to the target EVM chain via alloy-rs with the
//! signing wallet attached, so every transaction sent through it is
//! signed and gas-filled automatically. Validates RPC connectivity at
//! startup and exposes a shared provider instance for all on-chain
//! operations.
//!
//! In alloy 0.9, `ProviderBuilder::new().wallet(..).on_http()` returns a
//! complex filler type. We store it as a type-erased `dyn Provider` to
//! keep the API clean across the adapter layer.

use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::{Client, Http};
use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::config::WatchConfig;

/// The HTTP transport `on_http` builds the provider over. `Provider`
/// defaults its transport parameter to `BoxTransport`, so the erased
/// trait object must name the transport explicitly.
pub type HttpRpc = Http<Client>;

/// Shared RPC provider backed by alloy-rs 0.9 with a signing wallet.
///
/// All chain adapters share a single provider instance to avoid
/// redundant connections. Uses `dyn Provider` for type erasure because
/// the builder returns a deeply-nested generic filler type that would
/// leak implementation details.
pub struct EvmProvider {
    /// The alloy HTTP provider with wallet filler (type-erased).
    provider: Arc<dyn Provider<HttpRpc> + Send + Sync>,
    /// Address of the signing wallet.
    signer_address: Address,
}

impl EvmProvider {
    /// Connect to the configured RPC endpoint with the signing key.
    ///
    /// The chain ID query doubles as a reachability check; an
    /// unreachable RPC endpoint fails startup here.
    #[instrument(skip_all)]
    pub async fn connect(config: &WatchConfig) -> Result<Self> {
        let signer: PrivateKeySigner = config
            .private_key
            .expose()
            .parse()
            .context("PRIVATE_KEY is not a valid signing key")?;
        let signer_address = signer.address();
        let wallet = EthereumWallet::from(signer);

        // alloy 0.9: on_http() is synchronous, returns impl Provider
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .on_http(config.rpc_url.parse().context("Invalid RPC URL")?);

        // Wrap in Arc<dyn Provider> for type erasure
        let provider: Arc<dyn Provider<HttpRpc> + Send + Sync> = Arc::new(provider);

        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID — is the RPC endpoint reachable?")?;

        info!(chain_id, signer = %signer_address, "Connected to RPC");

        Ok(Self {
            provider,
            signer_address,
        })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider<HttpRpc> + Send + Sync> {
        Arc::clone(&self.provider)
    }

    /// Address of the wallet that signs submitted swaps.
    pub fn signer_address(&self) -> Address {
        self.signer_address
    }

    /// Check if the RPC connection is healthy via a lightweight call.
    pub async fn is_healthy(&self) -> bool {
        self.provider.get_block_number().await.is_ok()
    }
}
