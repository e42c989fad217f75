/// Client configuration: node endpoints, contract address and poll cadence.
use std::path::Path;
use std::time::Duration;

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::error::{DappError, Result};

/// Fixed deployment address of the staking custom-precompiled contract.
pub const STAKING_FIXED_ADDRESS: Address = address!("cc01000000000000000000000000000000000001");

/// Local node endpoint used when nothing else is configured.
pub const DEFAULT_NODE_URL: &str = "http://localhost:8545";

const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
const DEFAULT_POLL_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_DENOM: &str = "wei";
const DEFAULT_DEMO_VALIDATOR: &str = "evmvaloper1cqetlv987ntelz7s6ntvv95ltrns9qt6et40np";
/// Upper-cased application name of the chain, the `DelegateMessage` domain name.
const DEFAULT_MESSAGE_DOMAIN_NAME: &str = "EVERMINT";

/// Receipt poll cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            timeout: Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS),
        }
    }
}

/// Stored client configuration (`config.json` in the data directory).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DappConfig {
    pub node_url: String,
    /// JSON-RPC endpoint holding the unlocked accounts. Falls back to `node_url`.
    pub wallet_url: Option<String>,
    pub staking_address: String,
    pub poll_interval_ms: u64,
    pub poll_timeout_ms: u64,
    pub enable_redelegate: bool,
    pub denom: String,
    pub demo_validator: String,
    /// EIP-712 domain name the chain verifies `delegateByMessage` signatures against.
    pub message_domain_name: String,
}

impl Default for DappConfig {
    fn default() -> Self {
        Self {
            node_url: DEFAULT_NODE_URL.to_string(),
            wallet_url: None,
            staking_address: STAKING_FIXED_ADDRESS.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            poll_timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
            enable_redelegate: false,
            denom: DEFAULT_DENOM.to_string(),
            demo_validator: DEFAULT_DEMO_VALIDATOR.to_string(),
            message_domain_name: DEFAULT_MESSAGE_DOMAIN_NAME.to_string(),
        }
    }
}

impl DappConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DappError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: DappConfig = serde_json::from_str(&raw).map_err(|e| {
            DappError::Config(format!("Invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_url(&self.node_url)?;
        if let Some(url) = &self.wallet_url {
            validate_url(url)?;
        }
        self.staking_address()?;
        if self.poll_interval_ms == 0 {
            return Err(DappError::Config("poll_interval_ms must be positive".into()));
        }
        if self.poll_timeout_ms < self.poll_interval_ms {
            return Err(DappError::Config(
                "poll_timeout_ms must not be shorter than poll_interval_ms".into(),
            ));
        }
        Ok(())
    }

    pub fn staking_address(&self) -> Result<Address> {
        self.staking_address.parse::<Address>().map_err(|e| {
            DappError::Config(format!(
                "Invalid staking address '{}': {e}",
                self.staking_address
            ))
        })
    }

    pub fn wallet_url(&self) -> &str {
        self.wallet_url.as_deref().unwrap_or(&self.node_url)
    }

    pub fn poll(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            timeout: Duration::from_millis(self.poll_timeout_ms),
        }
    }
}

fn validate_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(());
    }
    Err(DappError::Config(format!(
        "Invalid endpoint URL '{url}'. Expected an http:// or https:// URL."
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_deployment() {
        let config = DappConfig::default();
        assert_eq!(config.staking_address().unwrap(), STAKING_FIXED_ADDRESS);
        assert_eq!(config.wallet_url(), DEFAULT_NODE_URL);
        assert_eq!(config.poll(), PollConfig::default());
        assert_eq!(PollConfig::default().interval, Duration::from_secs(1));
        assert_eq!(PollConfig::default().timeout, Duration::from_secs(15));
        assert!(!config.enable_redelegate);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"node_url":"http://127.0.0.1:9545","poll_timeout_ms":3000}"#)
            .unwrap();

        let config = DappConfig::load(&path).unwrap();
        assert_eq!(config.node_url, "http://127.0.0.1:9545");
        assert_eq!(config.poll().timeout, Duration::from_secs(3));
        assert_eq!(config.poll().interval, Duration::from_secs(1));
        assert_eq!(config.denom, "wei");
        assert_eq!(config.message_domain_name, "EVERMINT");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DappConfig::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, DappConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        let bad_url = DappConfig {
            node_url: "localhost:8545".into(),
            ..DappConfig::default()
        };
        assert!(bad_url.validate().is_err());

        let bad_address = DappConfig {
            staking_address: "0x1234".into(),
            ..DappConfig::default()
        };
        assert!(bad_address.validate().is_err());

        let zero_interval = DappConfig {
            poll_interval_ms: 0,
            ..DappConfig::default()
        };
        assert!(zero_interval.validate().is_err());

        let short_timeout = DappConfig {
            poll_interval_ms: 2_000,
            poll_timeout_ms: 1_000,
            ..DappConfig::default()
        };
        assert!(short_timeout.validate().is_err());
    }
}
