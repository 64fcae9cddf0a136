//! Error types for the swap adapter

use ethers::types::U256;
use thiserror::Error;

use crate::aggregator::AggregatorError;

/// Result type alias for swap operations
pub type Result<T> = std::result::Result<T, SwapError>;

/// Main error type for swap operations
#[derive(Debug, Error)]
pub enum SwapError {
    /// Malformed swap request (equal tokens, amount arity)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The account has no provider to reach the network through
    #[error("The wallet must be connected to a provider in order to perform swap operations")]
    NotConnected,

    /// The bound account variant cannot perform the operation
    #[error("Operation not supported: {0}")]
    Unsupported(String),

    /// Quoted fee is above the configured ceiling; nothing was broadcast
    #[error("Exceeded maximum fee cost for swap operation: fee {fee} > max {max_fee}")]
    FeeExceeded {
        /// Fee quoted for the whole swap
        fee: U256,
        /// Effective ceiling for this call
        max_fee: U256,
    },

    /// Invalid adapter settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failure from the provider, aggregator or account, passed through as-is
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl From<AggregatorError> for SwapError {
    fn from(err: AggregatorError) -> Self {
        SwapError::Upstream(err.into())
    }
}

impl From<dex::AbiError> for SwapError {
    fn from(err: dex::AbiError) -> Self {
        SwapError::Upstream(err.into())
    }
}

impl SwapError {
    /// Check if the error was raised by the adapter before any network call
    pub fn is_rejected_locally(&self) -> bool {
        matches!(
            self,
            SwapError::InvalidArgument(_)
                | SwapError::NotConnected
                | SwapError::Unsupported(_)
                | SwapError::Configuration(_)
        )
    }

    /// Check if the error originated in a collaborator
    pub fn is_upstream(&self) -> bool {
        matches!(self, SwapError::Upstream(_))
    }
}
