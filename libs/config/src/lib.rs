//! # Swap Adapter Centralized Configuration
//!
//! This crate provides centralized configuration loading and constants
//! for the swap adapter services, eliminating duplication across crates.
//!
//! ## Features
//!
//! - **Aggregator Constants**: ParaSwap endpoint, API version, partner tag
//! - **Chain Constants**: Chain ids and token addresses with special handling
//! - **Layered Settings**: TOML file, then `SWAP_*` environment overrides
//!
//! ## Usage
//!
//! ```rust,no_run
//! use swap_config::{aggregator, load_settings};
//!
//! let settings = load_settings(None)?;
//! assert!(!aggregator::PARASWAP_API_URL.is_empty());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod constants;
pub mod swap_settings;

// Re-export commonly used types
pub use constants::*;
pub use swap_settings::{load_settings, AggregatorSettings, SwapSettings};
