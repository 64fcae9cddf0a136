//! Wallet account capabilities
//!
//! An account is one of three shapes. Read-only accounts can only report their
//! address. Simple accounts send one transaction at a time. Bundled accounts
//! (smart accounts with a paymaster) submit an ordered list atomically.
//!
//! Implementations report failures as `anyhow::Error`; the adapter surfaces
//! them unchanged.

use async_trait::async_trait;
use ethers::types::{Address, U256};
use std::fmt;
use std::sync::Arc;

use crate::types::TransactionIntent;

/// A transaction (or bundle) accepted by the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTransaction {
    pub hash: String,
    pub fee: U256,
}

/// Estimated cost of sending a transaction (or bundle)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeQuote {
    pub fee: U256,
}

/// Options forwarded to bundled accounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleOptions {
    /// Token the paymaster charges the bundle fee in
    pub paymaster_token: Option<Address>,
}

/// Anything with an on-chain address
#[async_trait]
pub trait AccountAddress: Send + Sync {
    async fn address(&self) -> anyhow::Result<Address>;
}

/// Account that signs and sends individual transactions
#[async_trait]
pub trait SimpleAccount: AccountAddress {
    async fn quote_send_transaction(&self, tx: &TransactionIntent) -> anyhow::Result<FeeQuote>;

    async fn send_transaction(&self, tx: &TransactionIntent) -> anyhow::Result<SentTransaction>;
}

/// Account that submits an ordered batch as one atomic operation
#[async_trait]
pub trait BundledAccount: AccountAddress {
    async fn quote_send_transactions(
        &self,
        txs: &[TransactionIntent],
        options: &BundleOptions,
    ) -> anyhow::Result<FeeQuote>;

    async fn send_transactions(
        &self,
        txs: &[TransactionIntent],
        options: &BundleOptions,
    ) -> anyhow::Result<SentTransaction>;
}

/// Account variant bound to a swap adapter
#[derive(Clone)]
pub enum WalletAccount {
    ReadOnly(Arc<dyn AccountAddress>),
    Simple(Arc<dyn SimpleAccount>),
    Bundled(Arc<dyn BundledAccount>),
}

/// Variant tag, mostly for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    ReadOnly,
    Simple,
    Bundled,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::ReadOnly => write!(f, "read-only"),
            AccountKind::Simple => write!(f, "simple"),
            AccountKind::Bundled => write!(f, "bundled"),
        }
    }
}

impl WalletAccount {
    pub fn read_only(account: impl AccountAddress + 'static) -> Self {
        WalletAccount::ReadOnly(Arc::new(account))
    }

    pub fn simple(account: impl SimpleAccount + 'static) -> Self {
        WalletAccount::Simple(Arc::new(account))
    }

    pub fn bundled(account: impl BundledAccount + 'static) -> Self {
        WalletAccount::Bundled(Arc::new(account))
    }

    pub async fn address(&self) -> anyhow::Result<Address> {
        match self {
            WalletAccount::ReadOnly(account) => account.address().await,
            WalletAccount::Simple(account) => account.address().await,
            WalletAccount::Bundled(account) => account.address().await,
        }
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            WalletAccount::ReadOnly(_) => AccountKind::ReadOnly,
            WalletAccount::Simple(_) => AccountKind::Simple,
            WalletAccount::Bundled(_) => AccountKind::Bundled,
        }
    }

    /// Whether the account can send transactions at all
    pub fn can_sign(&self) -> bool {
        !matches!(self, WalletAccount::ReadOnly(_))
    }
}

impl fmt::Debug for WalletAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WalletAccount").field(&self.kind()).finish()
    }
}
