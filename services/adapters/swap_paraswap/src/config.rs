//! Swap adapter configuration
//!
//! Typed counterpart of [`swap_config::SwapSettings`]. Settings are loaded as
//! text by the config crate and parsed here into on-chain types, so a bad fee
//! ceiling or token address fails at construction instead of mid-swap.
//!
//! Per-call overrides are layered over the adapter defaults by
//! [`SwapConfig::resolve`], once per `execute` call.

use ethers::types::{Address, U256};
use std::path::Path;
use std::time::Duration;
use swap_config::{aggregator, AggregatorSettings, SwapSettings};
use url::Url;

use crate::error::{Result, SwapError};

/// ParaSwap client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// REST API root, e.g. `https://api.paraswap.io`
    pub base_url: Url,
    /// Partner tag sent with every built transaction
    pub partner: String,
    /// Price route version requested from `/prices`
    pub api_version: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(aggregator::PARASWAP_API_URL)
                .expect("default aggregator URL is valid"),
            partner: aggregator::DEFAULT_PARTNER.to_string(),
            api_version: aggregator::DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(aggregator::REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AggregatorConfig {
    /// Parse and validate raw aggregator settings
    pub fn from_settings(settings: &AggregatorSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            SwapError::Configuration(format!(
                "invalid aggregator base_url '{}': {}",
                settings.base_url, e
            ))
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(SwapError::Configuration(format!(
                "aggregator base_url must be http(s), got '{}'",
                base_url.scheme()
            )));
        }

        if settings.partner.is_empty() {
            return Err(SwapError::Configuration(
                "aggregator partner cannot be empty".to_string(),
            ));
        }

        if settings.timeout_secs == 0 {
            return Err(SwapError::Configuration(
                "aggregator timeout_secs must be positive".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            partner: settings.partner.clone(),
            api_version: settings.api_version.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }
}

/// Adapter-level defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapConfig {
    /// Maximum total fee a swap may cost; unset means no ceiling
    pub swap_max_fee: Option<U256>,
    /// Token bundled accounts pay fees in
    pub paymaster_token: Option<Address>,
    pub aggregator: AggregatorConfig,
}

/// Per-call override for [`SwapConfig`] defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapConfigOverride {
    pub swap_max_fee: Option<U256>,
    pub paymaster_token: Option<Address>,
}

/// Effective fee settings for one `execute` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedSwapConfig {
    pub swap_max_fee: Option<U256>,
    pub paymaster_token: Option<Address>,
}

impl ResolvedSwapConfig {
    /// Reject `fee` if it is above the ceiling. A fee equal to the ceiling passes.
    pub fn check_fee(&self, fee: U256) -> Result<()> {
        match self.swap_max_fee {
            Some(max_fee) if fee > max_fee => Err(SwapError::FeeExceeded { fee, max_fee }),
            _ => Ok(()),
        }
    }
}

impl SwapConfig {
    /// Parse raw settings into a typed configuration
    pub fn from_settings(settings: &SwapSettings) -> Result<Self> {
        let swap_max_fee = settings
            .swap_max_fee
            .as_deref()
            .map(|raw| {
                U256::from_dec_str(raw.trim()).map_err(|e| {
                    SwapError::Configuration(format!("invalid swap_max_fee '{}': {:?}", raw, e))
                })
            })
            .transpose()?;

        let paymaster_token = settings
            .paymaster_token
            .as_deref()
            .map(|raw| {
                raw.trim().parse::<Address>().map_err(|e| {
                    SwapError::Configuration(format!("invalid paymaster_token '{}': {}", raw, e))
                })
            })
            .transpose()?;

        Ok(Self {
            swap_max_fee,
            paymaster_token,
            aggregator: AggregatorConfig::from_settings(&settings.aggregator)?,
        })
    }

    /// Load settings from an optional TOML file plus `SWAP_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = swap_config::load_settings(path)
            .map_err(|e| SwapError::Configuration(format!("{:#}", e)))?;
        Self::from_settings(&settings)
    }

    pub fn with_swap_max_fee(mut self, fee: impl Into<U256>) -> Self {
        self.swap_max_fee = Some(fee.into());
        self
    }

    pub fn with_paymaster_token(mut self, token: Address) -> Self {
        self.paymaster_token = Some(token);
        self
    }

    /// Layer a per-call override over these defaults, field by field
    pub fn resolve(&self, overrides: Option<&SwapConfigOverride>) -> ResolvedSwapConfig {
        match overrides {
            Some(o) => ResolvedSwapConfig {
                swap_max_fee: o.swap_max_fee.or(self.swap_max_fee),
                paymaster_token: o.paymaster_token.or(self.paymaster_token),
            },
            None => ResolvedSwapConfig {
                swap_max_fee: self.swap_max_fee,
                paymaster_token: self.paymaster_token,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_parse() {
        let config = SwapConfig::from_settings(&SwapSettings::default()).unwrap();
        assert_eq!(config, SwapConfig::default());
        assert_eq!(config.aggregator.base_url.as_str(), "https://api.paraswap.io/");
    }

    #[test]
    fn test_settings_values_are_parsed_exactly() {
        let settings = SwapSettings {
            swap_max_fee: Some("340282366920938463463374607431768211456".to_string()),
            paymaster_token: Some("0xdAC17F958D2ee523a2206206994597C13D831ec7".to_string()),
            ..Default::default()
        };

        let config = SwapConfig::from_settings(&settings).unwrap();

        // 2^128, beyond u128
        assert_eq!(config.swap_max_fee, Some(U256::one() << 128));
        assert_eq!(
            config.paymaster_token,
            Some("0xdac17f958d2ee523a2206206994597c13d831ec7".parse().unwrap())
        );
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let bad_fee = SwapSettings {
            swap_max_fee: Some("1.5".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            SwapConfig::from_settings(&bad_fee),
            Err(SwapError::Configuration(_))
        ));

        let bad_token = SwapSettings {
            paymaster_token: Some("usdt".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            SwapConfig::from_settings(&bad_token),
            Err(SwapError::Configuration(_))
        ));

        let mut bad_url = SwapSettings::default();
        bad_url.aggregator.base_url = "ftp://paraswap".to_string();
        assert!(matches!(
            SwapConfig::from_settings(&bad_url),
            Err(SwapError::Configuration(_))
        ));

        let mut no_timeout = SwapSettings::default();
        no_timeout.aggregator.timeout_secs = 0;
        assert!(SwapConfig::from_settings(&no_timeout).is_err());
    }

    #[test]
    fn test_resolve_without_override_uses_defaults() {
        let token = Address::repeat_byte(0x77);
        let config = SwapConfig::default()
            .with_swap_max_fee(1000u64)
            .with_paymaster_token(token);

        let resolved = config.resolve(None);
        assert_eq!(resolved.swap_max_fee, Some(U256::from(1000u64)));
        assert_eq!(resolved.paymaster_token, Some(token));
    }

    #[test]
    fn test_resolve_layers_override_per_field() {
        let default_token = Address::repeat_byte(0x77);
        let config = SwapConfig::default()
            .with_swap_max_fee(1000u64)
            .with_paymaster_token(default_token);

        let overrides = SwapConfigOverride {
            swap_max_fee: Some(U256::from(5u64)),
            paymaster_token: None,
        };
        let resolved = config.resolve(Some(&overrides));

        assert_eq!(resolved.swap_max_fee, Some(U256::from(5u64)));
        assert_eq!(resolved.paymaster_token, Some(default_token));
    }

    #[test]
    fn test_fee_ceiling_boundaries() {
        let resolved = ResolvedSwapConfig {
            swap_max_fee: Some(U256::from(100u64)),
            paymaster_token: None,
        };

        assert!(resolved.check_fee(U256::from(99u64)).is_ok());
        assert!(resolved.check_fee(U256::from(100u64)).is_ok());
        assert!(matches!(
            resolved.check_fee(U256::from(101u64)),
            Err(SwapError::FeeExceeded { .. })
        ));

        let unbounded = ResolvedSwapConfig::default();
        assert!(unbounded.check_fee(U256::MAX).is_ok());
    }
}
