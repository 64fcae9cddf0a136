//! Swap adapter defaults and chain constants
//!
//! This module contains default configuration values and constants
//! used across the swap adapter crates for consistency.

/// Environment variable prefix for settings overrides (`SWAP_*`)
pub const ENV_PREFIX: &str = "SWAP";

/// Aggregator service defaults
pub mod aggregator {
    /// ParaSwap public REST API
    pub const PARASWAP_API_URL: &str = "https://api.paraswap.io";

    /// Price route API version requested from `/prices`
    pub const DEFAULT_API_VERSION: &str = "6.2";

    /// Partner tag attached to built transactions
    pub const DEFAULT_PARTNER: &str = "anon";

    /// HTTP request timeout (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Idle connection keep-alive for the HTTP pool (seconds)
    pub const POOL_IDLE_TIMEOUT_SECS: u64 = 60;
}

/// Chain identifiers
pub mod chains {
    /// Ethereum mainnet
    pub const ETHEREUM_MAINNET: u64 = 1;
}

/// Token addresses that need special handling
pub mod tokens {
    /// Tether USD on Ethereum mainnet. Reverts on `approve` while a non-zero
    /// allowance is outstanding.
    pub const USDT_MAINNET: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
}
