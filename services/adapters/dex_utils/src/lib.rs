//! Shared DEX functionality library
//!
//! This library provides the token-contract ABI plumbing shared by the swap
//! services: canonical function definitions, calldata encoding and return
//! value decoding.
//!
//! # Architecture
//!
//! ```text
//! services/adapters/dex_utils/
//! ├── abi/            # ABI definitions and codecs
//! │   └── erc20.rs    # ERC-20 approve / allowance
//! └── selectors.rs    # Hardcoded 4-byte function selectors
//! ```
//!
//! # Design Principles
//! - Single canonical source for token ABIs
//! - ethabi-backed encoding, no manual word packing
//! - Selector constants verified against the computed ABI in tests

pub mod abi;
pub mod selectors;

// Re-export commonly used types
pub use abi::{
    erc20::{decode_approve, decode_uint256, encode_allowance, encode_approve},
    AbiError,
};

// Re-export centralized selector constants
pub use selectors::{to_hex_string, ERC20_ALLOWANCE, ERC20_APPROVE};
