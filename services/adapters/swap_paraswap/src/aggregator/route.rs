//! ParaSwap price route
//!
//! The route is echoed back verbatim to `/transactions`, so unknown fields are
//! kept in `extra` and serialized again untouched.

use ethers::types::U256;
use serde::{Deserialize, Serialize};

use super::AggregatorError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRoute {
    pub src_token: String,
    pub dest_token: String,
    /// Decimal string, token smallest unit
    pub src_amount: String,
    /// Decimal string, token smallest unit
    pub dest_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_transfer_proxy: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PriceRoute {
    pub fn src_amount_u256(&self) -> Result<U256, AggregatorError> {
        parse_amount("srcAmount", &self.src_amount)
    }

    pub fn dest_amount_u256(&self) -> Result<U256, AggregatorError> {
        parse_amount("destAmount", &self.dest_amount)
    }
}

/// Exact decimal parse; amounts beyond 2^64 are common for 18-decimal tokens
pub(crate) fn parse_amount(field: &'static str, value: &str) -> Result<U256, AggregatorError> {
    let invalid = || AggregatorError::InvalidAmount {
        field,
        value: value.to_string(),
    };

    // from_dec_str("") yields zero
    if value.trim().is_empty() {
        return Err(invalid());
    }
    U256::from_dec_str(value).map_err(|_| invalid())
}
