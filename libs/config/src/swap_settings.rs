//! Swap Settings Module
//!
//! Provides settings loading for the swap adapter.
//! Supports an optional TOML file with `SWAP_*` environment overrides.
//!
//! Values are kept in their raw textual form here; the adapter crate parses
//! them into on-chain types and rejects anything malformed.

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::constants::{aggregator, ENV_PREFIX};

/// Top-level swap settings
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SwapSettings {
    /// Fee ceiling in the smallest native (or paymaster token) unit, decimal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_max_fee: Option<String>,

    /// Token bundled accounts pay operation fees in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_token: Option<String>,

    /// Aggregator client settings
    #[serde(default)]
    pub aggregator: AggregatorSettings,
}

/// ParaSwap client settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AggregatorSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_partner")]
    pub partner: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    aggregator::PARASWAP_API_URL.to_string()
}

fn default_partner() -> String {
    aggregator::DEFAULT_PARTNER.to_string()
}

fn default_api_version() -> String {
    aggregator::DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    aggregator::REQUEST_TIMEOUT_SECS
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            partner: default_partner(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SwapSettings {
    /// Load settings from an optional file with `SWAP_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    /// Load settings using a custom environment prefix
    ///
    /// Nested keys use a double underscore: `SWAP_AGGREGATOR__BASE_URL`.
    pub fn load_with_env_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading swap settings: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        } else {
            debug!("No swap settings file given, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder
            .build()
            .context("Failed to build swap settings")?;

        config
            .try_deserialize()
            .context("Failed to deserialize swap settings")
    }

    /// Expand environment variables in string values
    pub fn expand_env_vars(&mut self) -> Result<()> {
        let expanded = shellexpand::env(&self.aggregator.base_url)
            .context("Failed to expand aggregator base URL")?;
        self.aggregator.base_url = expanded.to_string();

        if let Some(token) = &self.paymaster_token {
            let expanded =
                shellexpand::env(token).context("Failed to expand paymaster token")?;
            self.paymaster_token = Some(expanded.to_string());
        }

        Ok(())
    }

    /// Save settings to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize swap settings")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write swap settings to {:?}", path))?;
        Ok(())
    }
}

/// Convenience function to load settings with env expansion applied
pub fn load_settings(path: Option<&Path>) -> Result<SwapSettings> {
    let mut settings = SwapSettings::load(path)?;
    settings.expand_env_vars()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_base_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("swap.toml");

        let contents = r#"
swap_max_fee = "1000000000000000"
paymaster_token = "0xdAC17F958D2ee523a2206206994597C13D831ec7"

[aggregator]
base_url = "https://paraswap.test"
partner = "wallet"
"#;
        fs::write(&path, contents).unwrap();

        let settings =
            SwapSettings::load_with_env_prefix(Some(&path), "SWAPTEST_BASE").unwrap();

        assert_eq!(settings.swap_max_fee.as_deref(), Some("1000000000000000"));
        assert_eq!(
            settings.paymaster_token.as_deref(),
            Some("0xdAC17F958D2ee523a2206206994597C13D831ec7")
        );
        assert_eq!(settings.aggregator.base_url, "https://paraswap.test");
        assert_eq!(settings.aggregator.partner, "wallet");
        // unspecified keys keep their defaults
        assert_eq!(settings.aggregator.api_version, aggregator::DEFAULT_API_VERSION);
        assert_eq!(settings.aggregator.timeout_secs, aggregator::REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = SwapSettings::load_with_env_prefix(None, "SWAPTEST_EMPTY").unwrap();
        assert_eq!(settings, SwapSettings::default());
        assert!(settings.swap_max_fee.is_none());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(SwapSettings::load_with_env_prefix(Some(&path), "SWAPTEST_MISSING").is_err());
    }

    #[test]
    fn test_environment_override() {
        std::env::set_var("SWAPTEST_ENV_SWAP_MAX_FEE", "42");
        std::env::set_var("SWAPTEST_ENV_AGGREGATOR__PARTNER", "env-partner");

        let settings = SwapSettings::load_with_env_prefix(None, "SWAPTEST_ENV").unwrap();

        assert_eq!(settings.swap_max_fee.as_deref(), Some("42"));
        assert_eq!(settings.aggregator.partner, "env-partner");

        // Cleanup
        std::env::remove_var("SWAPTEST_ENV_SWAP_MAX_FEE");
        std::env::remove_var("SWAPTEST_ENV_AGGREGATOR__PARTNER");
    }

    #[test]
    fn test_expand_env_vars_in_base_url() {
        std::env::set_var("SWAPTEST_PARASWAP_HOST", "paraswap.internal");
        let mut settings = SwapSettings::default();
        settings.aggregator.base_url = "https://${SWAPTEST_PARASWAP_HOST}/v6".to_string();

        settings.expand_env_vars().unwrap();

        assert_eq!(settings.aggregator.base_url, "https://paraswap.internal/v6");
        std::env::remove_var("SWAPTEST_PARASWAP_HOST");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.toml");

        let mut settings = SwapSettings::default();
        settings.swap_max_fee = Some("500".to_string());
        settings.save_to_file(&path).unwrap();

        let reloaded = SwapSettings::load_with_env_prefix(Some(&path), "SWAPTEST_SAVE").unwrap();
        assert_eq!(reloaded, settings);
    }
}
