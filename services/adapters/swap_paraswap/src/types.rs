//! Swap request, transaction intent and result types
//!
//! All amounts are integers in the token's smallest unit.

use ethers::types::{Address, Bytes, TransactionRequest, U256};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SwapError};

/// Which side of the trade is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    /// Exact input amount, output is quoted
    Sell,
    /// Exact output amount, input is quoted
    Buy,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Sell => "SELL",
            TradeSide::Buy => "BUY",
        }
    }
}

/// A one-sided swap request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub token_in: Address,
    pub token_out: Address,
    pub token_in_amount: Option<U256>,
    pub token_out_amount: Option<U256>,
    /// Receiver of the output tokens, defaults to the account itself
    pub to: Option<Address>,
}

impl SwapRequest {
    /// Sell exactly `amount` of `token_in`
    pub fn sell(token_in: Address, token_out: Address, amount: impl Into<U256>) -> Self {
        Self {
            token_in,
            token_out,
            token_in_amount: Some(amount.into()),
            token_out_amount: None,
            to: None,
        }
    }

    /// Buy exactly `amount` of `token_out`
    pub fn buy(token_in: Address, token_out: Address, amount: impl Into<U256>) -> Self {
        Self {
            token_in,
            token_out,
            token_in_amount: None,
            token_out_amount: Some(amount.into()),
            to: None,
        }
    }

    /// Send the output tokens to `to` instead of the account
    pub fn with_recipient(mut self, to: Address) -> Self {
        self.to = Some(to);
        self
    }

    /// Check the request invariants and resolve the trade side and its amount
    pub fn validate(&self) -> Result<(TradeSide, U256)> {
        if self.token_in == self.token_out {
            return Err(SwapError::InvalidArgument(
                "token_in and token_out cannot be equal".to_string(),
            ));
        }

        match (self.token_in_amount, self.token_out_amount) {
            (Some(_), Some(_)) => Err(SwapError::InvalidArgument(
                "cannot specify both token_in_amount and token_out_amount".to_string(),
            )),
            (None, None) => Err(SwapError::InvalidArgument(
                "one of token_in_amount or token_out_amount must be specified".to_string(),
            )),
            (Some(amount), None) => Ok((TradeSide::Sell, amount)),
            (None, Some(amount)) => Ok((TradeSide::Buy, amount)),
        }
    }
}

/// A transaction the account is asked to quote or send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIntent {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub from: Option<Address>,
}

impl TransactionIntent {
    /// Zero-value contract call
    pub fn contract_call(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            value: U256::zero(),
            data: data.into(),
            from: None,
        }
    }
}

impl From<&TransactionIntent> for TransactionRequest {
    fn from(intent: &TransactionIntent) -> Self {
        let tx = TransactionRequest::new()
            .to(intent.to)
            .value(intent.value)
            .data(intent.data.clone());

        match intent.from {
            Some(from) => tx.from(from),
            None => tx,
        }
    }
}

/// Result of a read-only quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    pub fee: U256,
    pub token_in_amount: U256,
    pub token_out_amount: U256,
}

/// Result of an executed swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Swap transaction hash, or the bundle hash for bundled accounts
    pub hash: String,
    /// Approval transaction hash; absent when the approval rode in the bundle
    pub approval_hash: Option<String>,
    /// Hash of the transaction that zeroed a stale allowance first, if one was needed
    pub reset_allowance_hash: Option<String>,
    pub fee: U256,
    pub token_in_amount: U256,
    pub token_out_amount: U256,
}

/// Transactions needed to perform one swap, in submission order
#[derive(Debug, Clone)]
pub(crate) struct SwapTransactions {
    pub reset_allowance: Option<TransactionIntent>,
    pub approval: TransactionIntent,
    pub swap: TransactionIntent,
    pub token_in_amount: U256,
    pub token_out_amount: U256,
}

impl SwapTransactions {
    /// All intents in the order they must land on-chain
    pub fn intents(&self) -> Vec<TransactionIntent> {
        self.reset_allowance
            .iter()
            .cloned()
            .chain([self.approval.clone(), self.swap.clone()])
            .collect()
    }
}
