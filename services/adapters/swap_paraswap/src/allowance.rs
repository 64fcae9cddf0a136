//! Tokens that refuse to change a non-zero allowance
//!
//! `approve(spender, n)` on these tokens reverts unless the current allowance
//! is zero, so a stale allowance has to be zeroed in a separate call first.

use ethers::types::{Address, Bytes, U256};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use swap_config::{chains, tokens};
use tracing::debug;

use crate::error::Result;
use crate::provider::ChainProvider;
use crate::types::TransactionIntent;

static DEFAULT_POLICY: Lazy<AllowanceResetPolicy> = Lazy::new(|| {
    let mut policy = AllowanceResetPolicy::empty();
    if let Ok(usdt) = tokens::USDT_MAINNET.parse() {
        policy.insert(chains::ETHEREUM_MAINNET, usdt);
    }
    policy
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowanceResetPolicy {
    tokens: HashMap<u64, HashSet<Address>>,
}

impl AllowanceResetPolicy {
    /// Policy that never resets
    pub fn empty() -> Self {
        Self::default()
    }

    /// Mainnet USDT only
    pub fn standard() -> Self {
        DEFAULT_POLICY.clone()
    }

    pub fn insert(&mut self, chain_id: u64, token: Address) {
        self.tokens.entry(chain_id).or_default().insert(token);
    }

    pub fn with_token(mut self, chain_id: u64, token: Address) -> Self {
        self.insert(chain_id, token);
        self
    }

    pub fn requires_reset(&self, chain_id: u64, token: Address) -> bool {
        self.tokens
            .get(&chain_id)
            .is_some_and(|set| set.contains(&token))
    }

    /// Build `approve(spender, 0)` if `token` is listed and `owner` has a
    /// non-zero allowance for `spender`
    pub async fn reset_intent(
        &self,
        provider: &dyn ChainProvider,
        chain_id: u64,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<Option<TransactionIntent>> {
        if !self.requires_reset(chain_id, token) {
            return Ok(None);
        }

        let call = dex::encode_allowance(owner, spender)?;
        let output = provider.eth_call(token, Bytes::from(call)).await?;
        let current = dex::decode_uint256(&output)?;

        if current.is_zero() {
            return Ok(None);
        }

        debug!(
            "Resetting allowance of {:?} for {:?} (currently {})",
            token, spender, current
        );
        let data = dex::encode_approve(spender, U256::zero())?;
        Ok(Some(TransactionIntent::contract_call(token, data)))
    }
}
