//! In-memory collaborators for exercising the adapter without a network
//!
//! Every mock records what it was asked to do so tests can assert on call
//! order and on the absence of broadcasts.

use anyhow::anyhow;
use async_trait::async_trait;
use ethers::types::{Address, Bytes, U256};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::account::{
    AccountAddress, BundleOptions, BundledAccount, FeeQuote, SentTransaction, SimpleAccount,
};
use crate::aggregator::{
    AggregatorClient, BuildTxOptions, BuildTxRequest, PriceRoute, RateRequest, SwapPayload,
};
use crate::lazy::AggregatorFactory;
use crate::provider::ChainProvider;
use crate::types::TransactionIntent;

/// Deterministic token address
pub fn token(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

/// Aggregator returning a fixed route
#[derive(Clone)]
pub struct MockAggregator {
    chain_id: u64,
    src_amount: String,
    dest_amount: String,
    swap_target: Address,
    swap_data: Bytes,
    rate_requests: Arc<Mutex<Vec<RateRequest>>>,
    build_requests: Arc<Mutex<Vec<(BuildTxRequest, BuildTxOptions)>>>,
    fail_rate: Arc<Mutex<Option<String>>>,
}

impl MockAggregator {
    pub fn new(src_amount: &str, dest_amount: &str) -> Self {
        Self {
            chain_id: 1,
            src_amount: src_amount.to_string(),
            dest_amount: dest_amount.to_string(),
            swap_target: Address::repeat_byte(0x5a),
            swap_data: Bytes::from(vec![0xe3, 0xea, 0xd5, 0x9e]),
            rate_requests: Arc::new(Mutex::new(Vec::new())),
            build_requests: Arc::new(Mutex::new(Vec::new())),
            fail_rate: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_chain_id(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Self::new("1", "1")
        }
    }

    /// Make the next `get_rate` fail with `message`
    pub fn fail_next_rate(&self, message: &str) {
        *self.fail_rate.lock() = Some(message.to_string());
    }

    /// Address the built swap transaction targets
    pub fn swap_target(&self) -> Address {
        self.swap_target
    }

    pub fn swap_data(&self) -> Bytes {
        self.swap_data.clone()
    }

    pub fn rate_requests(&self) -> Vec<RateRequest> {
        self.rate_requests.lock().clone()
    }

    pub fn build_requests(&self) -> Vec<(BuildTxRequest, BuildTxOptions)> {
        self.build_requests.lock().clone()
    }

    /// Factory handing out this aggregator, rebound to the provider's chain
    pub fn into_factory(self) -> AggregatorFactory {
        Arc::new(move |chain_id| {
            let mut aggregator = self.clone();
            aggregator.chain_id = chain_id;
            Box::pin(async move {
                Ok::<_, anyhow::Error>(Arc::new(aggregator) as Arc<dyn AggregatorClient>)
            })
        })
    }

    fn route(&self, request: &RateRequest) -> PriceRoute {
        PriceRoute {
            src_token: format!("{:?}", request.src_token),
            dest_token: format!("{:?}", request.dest_token),
            src_amount: self.src_amount.clone(),
            dest_amount: self.dest_amount.clone(),
            side: Some(request.side.as_str().to_string()),
            contract_address: Some(format!("{:?}", self.swap_target)),
            token_transfer_proxy: None,
            extra: serde_json::Map::new(),
        }
    }
}

#[async_trait]
impl AggregatorClient for MockAggregator {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn get_rate(&self, request: &RateRequest) -> anyhow::Result<PriceRoute> {
        self.rate_requests.lock().push(request.clone());
        if let Some(message) = self.fail_rate.lock().take() {
            return Err(anyhow!(message));
        }
        Ok(self.route(request))
    }

    async fn build_tx(
        &self,
        request: &BuildTxRequest,
        options: &BuildTxOptions,
    ) -> anyhow::Result<SwapPayload> {
        self.build_requests.lock().push((request.clone(), *options));
        Ok(SwapPayload {
            from: Some(request.user_address),
            to: self.swap_target,
            value: U256::zero(),
            data: self.swap_data.clone(),
        })
    }
}

/// Provider with a fixed chain id and a canned `allowance` answer
pub struct MockChainProvider {
    chain_id: u64,
    allowance: U256,
    chain_id_calls: AtomicUsize,
    chain_id_failure: Mutex<Option<String>>,
    calls: Mutex<Vec<(Address, Bytes)>>,
}

impl MockChainProvider {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            allowance: U256::zero(),
            chain_id_calls: AtomicUsize::new(0),
            chain_id_failure: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_allowance(mut self, allowance: U256) -> Self {
        self.allowance = allowance;
        self
    }

    pub fn fail_chain_id_once(&self, message: &str) {
        *self.chain_id_failure.lock() = Some(message.to_string());
    }

    pub fn chain_id_calls(&self) -> usize {
        self.chain_id_calls.load(Ordering::SeqCst)
    }

    /// `eth_call`s received, in order
    pub fn calls(&self) -> Vec<(Address, Bytes)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ChainProvider for MockChainProvider {
    async fn chain_id(&self) -> anyhow::Result<u64> {
        self.chain_id_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.chain_id_failure.lock().take() {
            return Err(anyhow!(message));
        }
        Ok(self.chain_id)
    }

    async fn eth_call(&self, to: Address, data: Bytes) -> anyhow::Result<Bytes> {
        self.calls.lock().push((to, data));
        let mut word = [0u8; 32];
        self.allowance.to_big_endian(&mut word);
        Ok(Bytes::from(word.to_vec()))
    }
}

/// What a mock account was asked to do, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCall {
    Quote(TransactionIntent),
    Send(TransactionIntent),
    QuoteBundle(Vec<TransactionIntent>, BundleOptions),
    SendBundle(Vec<TransactionIntent>, BundleOptions),
}

/// Simple account with a fixed per-transaction fee and scripted hashes
pub struct MockSimpleAccount {
    address: Address,
    fee: U256,
    hashes: Mutex<VecDeque<String>>,
    fail_send_at: Option<usize>,
    sends: AtomicUsize,
    calls: Arc<Mutex<Vec<AccountCall>>>,
}

impl MockSimpleAccount {
    pub fn new(fee_per_tx: impl Into<U256>) -> Self {
        Self {
            address: Address::repeat_byte(0xac),
            fee: fee_per_tx.into(),
            hashes: Mutex::new(VecDeque::new()),
            fail_send_at: None,
            sends: AtomicUsize::new(0),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Hashes returned by successive sends
    pub fn with_hashes(self, hashes: &[&str]) -> Self {
        *self.hashes.lock() = hashes.iter().map(|h| h.to_string()).collect();
        self
    }

    /// Fail the send with this zero-based index
    pub fn fail_send_at(mut self, index: usize) -> Self {
        self.fail_send_at = Some(index);
        self
    }

    pub fn address_value(&self) -> Address {
        self.address
    }

    /// Shared call log, usable after the account moves into an adapter
    pub fn call_log(&self) -> Arc<Mutex<Vec<AccountCall>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl AccountAddress for MockSimpleAccount {
    async fn address(&self) -> anyhow::Result<Address> {
        Ok(self.address)
    }
}

#[async_trait]
impl SimpleAccount for MockSimpleAccount {
    async fn quote_send_transaction(&self, tx: &TransactionIntent) -> anyhow::Result<FeeQuote> {
        self.calls.lock().push(AccountCall::Quote(tx.clone()));
        Ok(FeeQuote { fee: self.fee })
    }

    async fn send_transaction(&self, tx: &TransactionIntent) -> anyhow::Result<SentTransaction> {
        let index = self.sends.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(AccountCall::Send(tx.clone()));

        if self.fail_send_at == Some(index) {
            return Err(anyhow!("nonce too low"));
        }

        let hash = self
            .hashes
            .lock()
            .pop_front()
            .unwrap_or_else(|| format!("0x{:064x}", index + 1));
        Ok(SentTransaction {
            hash,
            fee: self.fee,
        })
    }
}

/// Bundled account returning one fee and one hash per bundle
pub struct MockBundledAccount {
    address: Address,
    fee: U256,
    hash: String,
    calls: Arc<Mutex<Vec<AccountCall>>>,
}

impl MockBundledAccount {
    pub fn new(fee: impl Into<U256>, hash: &str) -> Self {
        Self {
            address: Address::repeat_byte(0xbc),
            fee: fee.into(),
            hash: hash.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_log(&self) -> Arc<Mutex<Vec<AccountCall>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl AccountAddress for MockBundledAccount {
    async fn address(&self) -> anyhow::Result<Address> {
        Ok(self.address)
    }
}

#[async_trait]
impl BundledAccount for MockBundledAccount {
    async fn quote_send_transactions(
        &self,
        txs: &[TransactionIntent],
        options: &BundleOptions,
    ) -> anyhow::Result<FeeQuote> {
        self.calls
            .lock()
            .push(AccountCall::QuoteBundle(txs.to_vec(), *options));
        Ok(FeeQuote { fee: self.fee })
    }

    async fn send_transactions(
        &self,
        txs: &[TransactionIntent],
        options: &BundleOptions,
    ) -> anyhow::Result<SentTransaction> {
        self.calls
            .lock()
            .push(AccountCall::SendBundle(txs.to_vec(), *options));
        Ok(SentTransaction {
            hash: self.hash.clone(),
            fee: self.fee,
        })
    }
}

/// Count broadcasts in a call log
pub fn send_count(calls: &[AccountCall]) -> usize {
    calls
        .iter()
        .filter(|c| matches!(c, AccountCall::Send(_) | AccountCall::SendBundle(..)))
        .count()
}
