//! Centralized ERC-20 Function Selector Constants
//!
//! These selectors are the first four bytes of the keccak256 hash of the
//! canonical Solidity function signatures. They prefix every calldata payload
//! the swap flow sends to a token contract.
//!
//! # Why Hardcoded Constants?
//!
//! Selectors are deterministic and part of the ERC-20 standard, so the
//! constants give zero-cost checks when inspecting calldata. The tests below
//! verify each one against the selector ethabi computes from the ABI.

/// ERC-20 approve selector
/// `approve(address spender, uint256 amount)`
/// keccak256("approve(address,uint256)")[..4]
pub const ERC20_APPROVE: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

/// ERC-20 allowance selector
/// `allowance(address owner, address spender)`
/// keccak256("allowance(address,address)")[..4]
pub const ERC20_ALLOWANCE: [u8; 4] = [0xdd, 0x62, 0xed, 0x3e];

/// Convert a selector to a 0x-prefixed hex string for logging
pub fn to_hex_string(selector: [u8; 4]) -> String {
    format!(
        "0x{:02x}{:02x}{:02x}{:02x}",
        selector[0], selector[1], selector[2], selector[3]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::erc20;

    #[test]
    fn verify_erc20_approve_selector() {
        let computed = erc20::approve_function().short_signature();
        assert_eq!(
            computed, ERC20_APPROVE,
            "approve selector mismatch: computed={:?}, constant={:?}",
            computed, ERC20_APPROVE
        );
    }

    #[test]
    fn verify_erc20_allowance_selector() {
        let computed = erc20::allowance_function().short_signature();
        assert_eq!(computed, ERC20_ALLOWANCE);
    }

    #[test]
    fn verify_string_conversion() {
        assert_eq!(to_hex_string(ERC20_APPROVE), "0x095ea7b3");
        assert_eq!(to_hex_string(ERC20_ALLOWANCE), "0xdd62ed3e");
    }
}
