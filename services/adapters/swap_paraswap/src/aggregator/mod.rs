//! Aggregator client seam
//!
//! The adapter asks an aggregator for a price route, then for the calldata
//! that executes it. [`paraswap::ParaSwapClient`] is the production client;
//! tests substitute their own.

pub mod paraswap;
pub mod route;

use async_trait::async_trait;
use ethers::types::{Address, Bytes, U256};
use thiserror::Error;

use crate::types::TradeSide;

pub use paraswap::ParaSwapClient;
pub use route::PriceRoute;

/// Price discovery request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRequest {
    pub src_token: Address,
    pub dest_token: Address,
    /// Input amount for sells, output amount for buys
    pub amount: U256,
    pub side: TradeSide,
}

/// Calldata request for a previously priced route
#[derive(Debug, Clone, PartialEq)]
pub struct BuildTxRequest {
    pub src_token: Address,
    pub dest_token: Address,
    pub src_amount: U256,
    pub dest_amount: U256,
    pub price_route: PriceRoute,
    pub user_address: Address,
    pub receiver: Address,
    pub partner: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTxOptions {
    /// Skip the aggregator's balance and allowance checks. The approval is
    /// only sent alongside the swap, so it cannot be on-chain yet.
    pub ignore_checks: bool,
}

impl Default for BuildTxOptions {
    fn default() -> Self {
        Self {
            ignore_checks: true,
        }
    }
}

/// Transaction returned by the aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPayload {
    pub from: Option<Address>,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Aggregator API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid {field} in aggregator response: {value}")]
    InvalidAmount { field: &'static str, value: String },

    #[error("Failed to decode aggregator response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid aggregator URL: {0}")]
    Url(#[from] url::ParseError),
}

#[async_trait]
pub trait AggregatorClient: Send + Sync {
    /// Network the client quotes for
    fn chain_id(&self) -> u64;

    async fn get_rate(&self, request: &RateRequest) -> anyhow::Result<PriceRoute>;

    async fn build_tx(
        &self,
        request: &BuildTxRequest,
        options: &BuildTxOptions,
    ) -> anyhow::Result<SwapPayload>;
}
