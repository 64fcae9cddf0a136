//! Concrete accounts backed by ethers
//!
//! [`LocalAccount`] signs with a private key held in memory and broadcasts
//! through a JSON-RPC provider. [`ReadOnlyAccount`] only knows its address.
//!
//! A send only returns once the transaction is mined, so a following intent
//! (the swap after its approval) gets the next nonce and is estimated against
//! the confirmed allowance.

use anyhow::{bail, Context};
use async_trait::async_trait;
use ethers::providers::{JsonRpcClient, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, BlockNumber, TransactionReceipt, TransactionRequest, H256, U64};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::account::{AccountAddress, FeeQuote, SentTransaction, SimpleAccount};
use crate::provider::chain_id_to_u64;
use crate::types::TransactionIntent;

const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(300);
const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Private-key account that sends legacy transactions
pub struct LocalAccount<P: JsonRpcClient> {
    wallet: LocalWallet,
    provider: Arc<Provider<P>>,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl<P: JsonRpcClient + 'static> LocalAccount<P> {
    pub fn new(wallet: LocalWallet, provider: Arc<Provider<P>>) -> Self {
        Self {
            wallet,
            provider,
            confirmation_timeout: CONFIRMATION_TIMEOUT,
            poll_interval: CONFIRMATION_POLL_INTERVAL,
        }
    }

    /// Parse a hex private key
    pub fn from_private_key(private_key: &str, provider: Arc<Provider<P>>) -> anyhow::Result<Self> {
        let wallet = private_key
            .parse::<LocalWallet>()
            .context("Invalid private key format")?;
        Ok(Self::new(wallet, provider))
    }

    /// Override how long a send waits for its receipt
    pub fn with_confirmation_polling(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn provider(&self) -> Arc<Provider<P>> {
        self.provider.clone()
    }

    fn request_for(&self, intent: &TransactionIntent) -> TransactionRequest {
        let tx: TransactionRequest = intent.into();
        if tx.from.is_none() {
            return tx.from(self.wallet.address());
        }
        tx
    }

    /// Poll for the receipt until it shows up or the timeout elapses
    async fn wait_for_receipt(&self, tx_hash: H256) -> anyhow::Result<TransactionReceipt> {
        debug!("⏳ Waiting for confirmation of 0x{:x}", tx_hash);

        let start_time = Instant::now();
        loop {
            if start_time.elapsed() > self.confirmation_timeout {
                bail!(
                    "Transaction 0x{:x} not confirmed after {:?}",
                    tx_hash,
                    self.confirmation_timeout
                );
            }

            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => {}
                Err(e) => warn!("Error checking receipt for 0x{:x}: {}", tx_hash, e),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl<P: JsonRpcClient + 'static> AccountAddress for LocalAccount<P> {
    async fn address(&self) -> anyhow::Result<Address> {
        Ok(self.wallet.address())
    }
}

#[async_trait]
impl<P: JsonRpcClient + 'static> SimpleAccount for LocalAccount<P> {
    async fn quote_send_transaction(&self, intent: &TransactionIntent) -> anyhow::Result<FeeQuote> {
        let typed: TypedTransaction = self.request_for(intent).into();

        let (gas, gas_price) = tokio::try_join!(
            self.provider.estimate_gas(&typed, None),
            self.provider.get_gas_price(),
        )?;

        crate::log_gas!("Estimated {} gas at {} wei", gas, gas_price);
        Ok(FeeQuote {
            fee: gas.saturating_mul(gas_price),
        })
    }

    async fn send_transaction(&self, intent: &TransactionIntent) -> anyhow::Result<SentTransaction> {
        let from = self.wallet.address();
        let mut typed: TypedTransaction = self.request_for(intent).into();

        // Count transactions still in the mempool too
        let (nonce, chain_id) = tokio::try_join!(
            self.provider
                .get_transaction_count(from, Some(BlockNumber::Pending.into())),
            self.provider.get_chainid(),
        )?;
        let chain_id = chain_id_to_u64(chain_id)?;
        typed.set_nonce(nonce);
        typed.set_chain_id(chain_id);

        self.provider
            .fill_transaction(&mut typed, None)
            .await
            .context("Failed to fill transaction")?;

        let gas = typed.gas().copied().unwrap_or_default();
        let gas_price = typed.gas_price().unwrap_or_default();

        let signature = self
            .wallet
            .clone()
            .with_chain_id(chain_id)
            .sign_transaction(&typed)
            .await
            .context("Failed to sign transaction")?;

        // Encode signed transaction with proper RLP encoding
        let raw_tx = typed.rlp_signed(&signature);
        let tx_hash = self.provider.send_raw_transaction(raw_tx).await?.tx_hash();

        let hash = format!("0x{:x}", tx_hash);
        debug!("Transaction submitted: {} (nonce {})", hash, nonce);

        let receipt = self.wait_for_receipt(tx_hash).await?;
        if receipt.status == Some(U64::zero()) {
            bail!("Transaction {} reverted", hash);
        }

        let fee = match (receipt.gas_used, receipt.effective_gas_price) {
            (Some(used), Some(price)) => used.saturating_mul(price),
            _ => gas.saturating_mul(gas_price),
        };

        crate::log_success!(
            "Transaction {} confirmed in block {}",
            hash,
            receipt.block_number.unwrap_or_default()
        );
        Ok(SentTransaction { hash, fee })
    }
}

/// Account that can be asked for quotes but never signs
#[derive(Debug, Clone, Copy)]
pub struct ReadOnlyAccount {
    address: Address,
}

impl ReadOnlyAccount {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

#[async_trait]
impl AccountAddress for ReadOnlyAccount {
    async fn address(&self) -> anyhow::Result<Address> {
        Ok(self.address)
    }
}
