//! Swap Contract Interactions - Balance Queries and Mirror Execution
//!
//! Implements the `ChainClient` port against an EVM swap contract with
//! two entry points: a payable `swapEthForToken` for mirrored buys and
//! `swapTokenForETH` for mirrored sells. The watched balance is either
//! the target account's native coin balance or its ERC-20 token balance,
//! fixed at construction. Contract addresses come from the environment
//! and are validated on-chain at startup.

use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use anyhow::{Context, Result, bail, ensure};
use async_trait::async_trait;
use chrono::Utc;
use tokio::time::{Instant, sleep};
use tracing::{info, instrument};

use crate::config::{WatchConfig, WatchMode};
use crate::domain::trade::{TradeIntent, TradeSide};
use crate::ports::chain_client::{ChainClient, PendingSwap, SwapOutcome};

use super::provider::EvmProvider;

sol! {
    function swapEthForToken(uint256 amountOutMin) external payable;
    function swapTokenForETH(address tokenIn, uint256 amountIn, uint256 amountOutMin) external;
    function balanceOf(address owner) external view returns (uint256);
}

/// Fixed gas limit for the payable buy path.
const SWAP_GAS_LIMIT: u64 = 300_000;

/// How long to wait for a submitted swap to be mined.
const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(180);

/// Interval between receipt polls while awaiting confirmation.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Implements mirrored-swap execution via alloy-rs 0.9.
///
/// One instance per watched account: target wallet, watch mode, and the
/// swap contract are captured at construction.
pub struct EvmSwapClient {
    /// Shared RPC provider with signing wallet.
    provider: Arc<EvmProvider>,
    /// Swap contract address.
    contract: Address,
    /// Account whose balance is watched.
    target_wallet: Address,
    /// Native coin or token balance.
    watch_mode: WatchMode,
    /// Token contract, present iff watching (or selling) a token.
    token_address: Option<Address>,
    /// Slippage floor passed to both swap entry points.
    min_amount_out: U256,
}

impl EvmSwapClient {
    /// Create the client and validate the contract addresses on-chain.
    ///
    /// Checks that the swap contract (and the token contract, in token
    /// mode) has deployed code. This prevents misconfiguration from
    /// silently failing at runtime.
    #[instrument(skip_all)]
    pub async fn new(provider: Arc<EvmProvider>, config: &WatchConfig) -> Result<Self> {
        let inner = provider.inner();

        let mut contracts = vec![("swap contract", config.contract_address)];
        if let Some(token) = config.token_address {
            contracts.push(("token contract", token));
        }

        for (name, addr) in contracts {
            let code = inner
                .get_code_at(addr)
                .await
                .with_context(|| format!("Failed to query code for {name}"))?;

            if code.is_empty() {
                bail!("{name} at {addr} has no deployed code — check configuration");
            }

            info!(contract = name, address = %addr, "Validated on-chain");
        }

        Ok(Self {
            provider,
            contract: config.contract_address,
            target_wallet: config.target_wallet,
            watch_mode: config.watch_mode,
            token_address: config.token_address,
            min_amount_out: config.min_amount_out,
        })
    }

    async fn token_balance(&self, token: Address) -> Result<U256> {
        let calldata = balanceOfCall {
            owner: self.target_wallet,
        }
        .abi_encode();

        let tx = TransactionRequest::default()
            .with_to(token)
            .with_input(calldata);

        let result = self
            .provider
            .inner()
            .call(&tx)
            .await
            .context("balanceOf call failed")?;

        ensure!(
            result.len() >= 32,
            "balanceOf returned {} bytes, expected 32",
            result.len()
        );
        Ok(U256::from_be_slice(&result[..32]))
    }
}

#[async_trait]
impl ChainClient for EvmSwapClient {
    #[instrument(skip(self))]
    async fn watched_balance(&self) -> Result<U256> {
        match self.watch_mode {
            WatchMode::Eth => self
                .provider
                .inner()
                .get_balance(self.target_wallet)
                .await
                .context("Native balance query failed"),
            WatchMode::Token => {
                // Presence is enforced at config validation; this guard
                // only turns a logic bug into a clean error.
                let token = self
                    .token_address
                    .context("token address missing in TOKEN mode")?;
                self.token_balance(token).await
            }
        }
    }

    #[instrument(skip(self, intent), fields(side = %intent.side, amount = %intent.amount))]
    async fn submit_swap(&self, intent: &TradeIntent) -> Result<PendingSwap> {
        let from = self.provider.signer_address();

        let tx = match intent.side {
            TradeSide::Buy => {
                let calldata = swapEthForTokenCall {
                    amountOutMin: self.min_amount_out,
                }
                .abi_encode();

                TransactionRequest::default()
                    .with_from(from)
                    .with_to(self.contract)
                    .with_value(intent.amount)
                    .with_input(calldata)
                    .with_gas_limit(SWAP_GAS_LIMIT)
            }
            TradeSide::Sell => {
                let token = self
                    .token_address
                    .context("token address required to sell")?;
                let calldata = swapTokenForETHCall {
                    tokenIn: token,
                    amountIn: intent.amount,
                    amountOutMin: self.min_amount_out,
                }
                .abi_encode();

                TransactionRequest::default()
                    .with_from(from)
                    .with_to(self.contract)
                    .with_input(calldata)
            }
        };

        let pending = self
            .provider
            .inner()
            .send_transaction(tx)
            .await
            .context("Swap transaction submission failed")?;

        Ok(PendingSwap {
            tx_hash: format!("{:#x}", pending.tx_hash()),
            submitted_at: Utc::now(),
        })
    }

    #[instrument(skip(self, pending), fields(tx_hash = %pending.tx_hash))]
    async fn await_confirmation(&self, pending: &PendingSwap) -> Result<SwapOutcome> {
        let hash: TxHash = pending
            .tx_hash
            .parse()
            .context("Invalid transaction hash")?;
        let inner = self.provider.inner();
        let deadline = Instant::now() + CONFIRMATION_TIMEOUT;

        loop {
            let receipt = inner
                .get_transaction_receipt(hash)
                .await
                .context("Receipt query failed")?;

            if let Some(receipt) = receipt {
                return Ok(SwapOutcome {
                    tx_hash: pending.tx_hash.clone(),
                    confirmed: receipt.status(),
                    block_number: receipt.block_number,
                    confirmed_at: Utc::now(),
                });
            }

            if Instant::now() >= deadline {
                bail!(
                    "transaction {} not mined within {}s",
                    pending.tx_hash,
                    CONFIRMATION_TIMEOUT.as_secs()
                );
            }
            sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }

    async fn is_healthy(&self) -> bool {
        self.provider.is_healthy().await
    }
}
