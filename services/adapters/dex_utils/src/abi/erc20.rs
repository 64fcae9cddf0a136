//! ERC-20 token ABIs
//!
//! Canonical definitions for the two ERC-20 functions the swap flow needs:
//! `approve` to grant the aggregator router an allowance, and `allowance` to
//! read the current grant before resetting it.

use super::AbiError;
use ethabi::ethereum_types::{Address, U256};
use ethabi::{Function, Param, ParamType, StateMutability, Token};

use crate::selectors::ERC20_APPROVE;

/// ERC-20 approve function ABI definition
/// function approve(address spender, uint256 amount) returns (bool)
#[allow(deprecated)]
pub fn approve_function() -> Function {
    Function {
        name: "approve".to_string(),
        inputs: vec![
            Param {
                name: "spender".to_string(),
                kind: ParamType::Address,
                internal_type: None,
            },
            Param {
                name: "amount".to_string(),
                kind: ParamType::Uint(256),
                internal_type: None,
            },
        ],
        outputs: vec![Param {
            name: String::new(),
            kind: ParamType::Bool,
            internal_type: None,
        }],
        constant: None,
        state_mutability: StateMutability::NonPayable,
    }
}

/// ERC-20 allowance function ABI definition
/// function allowance(address owner, address spender) view returns (uint256)
#[allow(deprecated)]
pub fn allowance_function() -> Function {
    Function {
        name: "allowance".to_string(),
        inputs: vec![
            Param {
                name: "owner".to_string(),
                kind: ParamType::Address,
                internal_type: None,
            },
            Param {
                name: "spender".to_string(),
                kind: ParamType::Address,
                internal_type: None,
            },
        ],
        outputs: vec![Param {
            name: String::new(),
            kind: ParamType::Uint(256),
            internal_type: None,
        }],
        constant: None,
        state_mutability: StateMutability::View,
    }
}

/// Encode `approve(spender, amount)` calldata, selector included
pub fn encode_approve(spender: Address, amount: U256) -> Result<Vec<u8>, AbiError> {
    let data = approve_function().encode_input(&[Token::Address(spender), Token::Uint(amount)])?;
    Ok(data)
}

/// Encode `allowance(owner, spender)` calldata, selector included
pub fn encode_allowance(owner: Address, spender: Address) -> Result<Vec<u8>, AbiError> {
    let data = allowance_function().encode_input(&[Token::Address(owner), Token::Address(spender)])?;
    Ok(data)
}

/// Decode `approve` calldata back into `(spender, amount)`
pub fn decode_approve(calldata: &[u8]) -> Result<(Address, U256), AbiError> {
    if calldata.len() < 4 {
        return Err(AbiError::TruncatedCalldata {
            len: calldata.len(),
        });
    }

    let (selector, args) = calldata.split_at(4);
    if selector != ERC20_APPROVE {
        return Err(AbiError::SelectorMismatch {
            expected: hex_selector(&ERC20_APPROVE),
            found: hex_selector(selector),
        });
    }

    let mut tokens = approve_function().decode_input(args)?.into_iter();
    let spender = tokens
        .next()
        .and_then(Token::into_address)
        .ok_or_else(|| AbiError::MissingField("spender".to_string()))?;
    let amount = tokens
        .next()
        .and_then(Token::into_uint)
        .ok_or_else(|| AbiError::MissingField("amount".to_string()))?;

    Ok((spender, amount))
}

/// Decode a single `uint256` return value (e.g. the `allowance` output)
pub fn decode_uint256(output: &[u8]) -> Result<U256, AbiError> {
    ethabi::decode(&[ParamType::Uint(256)], output)?
        .into_iter()
        .next()
        .and_then(Token::into_uint)
        .ok_or_else(|| AbiError::MissingField("uint256".to_string()))
}

fn hex_selector(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_calldata_layout() {
        let spender = Address::repeat_byte(0x11);
        let data = encode_approve(spender, U256::from(1_000_000u64)).unwrap();

        // selector + two 32-byte words
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &ERC20_APPROVE);
        assert_eq!(&data[4..16], &[0u8; 12]);
        assert_eq!(&data[16..36], spender.as_bytes());
        assert_eq!(U256::from_big_endian(&data[36..68]), U256::from(1_000_000u64));
    }

    #[test]
    fn approve_max_amount_is_not_truncated() {
        let data = encode_approve(Address::zero(), U256::MAX).unwrap();
        assert_eq!(&data[36..68], &[0xffu8; 32]);
    }

    #[test]
    fn decode_rejects_foreign_selector() {
        let data = encode_allowance(Address::zero(), Address::zero()).unwrap();
        let err = decode_approve(&data).unwrap_err();
        assert!(matches!(err, AbiError::SelectorMismatch { .. }));
    }

    #[test]
    fn decode_rejects_short_calldata() {
        let err = decode_approve(&[0x09, 0x5e]).unwrap_err();
        assert!(matches!(err, AbiError::TruncatedCalldata { len: 2 }));
    }

    #[test]
    fn decode_uint256_output() {
        let mut word = [0u8; 32];
        word[31] = 42;
        assert_eq!(decode_uint256(&word).unwrap(), U256::from(42u64));
        assert!(decode_uint256(&[0u8; 7]).is_err());
    }
}
