//! # Swap Adapter
//!
//! Token swaps for EVM wallet accounts, priced and routed by the ParaSwap
//! aggregator.
//!
//! ## Architecture
//!
//! ```text
//! SwapRequest → SwapAdapter → AggregatorClient (price route + calldata)
//!                   ↓
//!         [reset] + approve + swap intents
//!                   ↓
//!   WalletAccount::Simple  → quote/send each, in order
//!   WalletAccount::Bundled → quote/send one atomic bundle
//! ```
//!
//! The adapter never signs anything itself. Fee estimation, signing and
//! broadcast belong to the wallet account; routing belongs to the aggregator.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ethers::providers::{Http, Provider};
//! use swap_paraswap::{
//!     ChainProvider, LocalAccount, SwapAdapter, SwapConfig, SwapRequest, WalletAccount,
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let provider = Arc::new(Provider::<Http>::try_from("https://eth.llamarpc.com")?);
//! let account = LocalAccount::from_private_key("0x...", provider.clone())?;
//! let adapter = SwapAdapter::new(
//!     WalletAccount::simple(account),
//!     Some(provider as Arc<dyn ChainProvider>),
//!     SwapConfig::load(None)?.with_swap_max_fee(10_000_000_000_000_000u64),
//! );
//!
//! let usdt = "0xdAC17F958D2ee523a2206206994597C13D831ec7".parse()?;
//! let dai = "0x6B175474E89094C44Da98b954EedeAC495271d0F".parse()?;
//! let outcome = adapter
//!     .execute(&SwapRequest::sell(usdt, dai, 1_000_000u64), None)
//!     .await?;
//! println!("swap {} approval {:?}", outcome.hash, outcome.approval_hash);
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod adapter;
pub mod aggregator;
pub mod allowance;
pub mod config;
pub mod error;
pub mod lazy;
pub mod logging;
pub mod provider;
pub mod signer;
pub mod test_utils;
pub mod types;

pub use account::{
    AccountAddress, AccountKind, BundleOptions, BundledAccount, FeeQuote, SentTransaction,
    SimpleAccount, WalletAccount,
};
pub use adapter::SwapAdapter;
pub use aggregator::{AggregatorClient, AggregatorError, ParaSwapClient, PriceRoute};
pub use allowance::AllowanceResetPolicy;
pub use config::{AggregatorConfig, ResolvedSwapConfig, SwapConfig, SwapConfigOverride};
pub use error::{Result, SwapError};
pub use lazy::{paraswap_factory, AggregatorFactory, LazyAggregator};
pub use provider::ChainProvider;
pub use signer::{LocalAccount, ReadOnlyAccount};
pub use types::{SwapOutcome, SwapQuote, SwapRequest, TradeSide, TransactionIntent};
