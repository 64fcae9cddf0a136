//! ABI definitions and calldata codecs for token contracts
//!
//! This module provides:
//! - Canonical ABI definitions for the ERC-20 functions the swap flow calls
//! - Type-safe calldata encoders and output decoders built on ethabi

pub mod erc20;

/// Error types for ABI encoding and decoding
#[derive(Debug, thiserror::Error)]
pub enum AbiError {
    #[error("ABI parsing failed: {0}")]
    AbiParsingError(String),

    #[error("Selector mismatch: expected 0x{expected}, found 0x{found}")]
    SelectorMismatch { expected: String, found: String },

    #[error("Calldata too short: {len} bytes")]
    TruncatedCalldata { len: usize },

    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl From<ethabi::Error> for AbiError {
    fn from(err: ethabi::Error) -> Self {
        AbiError::AbiParsingError(err.to_string())
    }
}
