use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use f20_chain::{ChainAccess, ChainError, HttpWallet, DEFAULT_CONTRACT_ADDRESS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "F20_DAPP_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "f20-dapp.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level front-end configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DappConfig {
    #[serde(default)]
    pub wallet: WalletSection,
    #[serde(default)]
    pub contract: ContractSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSection {
    /// JSON-RPC endpoint of the locally running wallet.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSection {
    #[serde(default = "default_contract_address")]
    pub address: Address,
    #[serde(default = "default_confirmation_poll_ms")]
    pub confirmation_poll_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:1248".to_string()
}

fn default_contract_address() -> Address {
    DEFAULT_CONTRACT_ADDRESS
}

fn default_confirmation_poll_ms() -> u64 {
    1_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WalletSection {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
        }
    }
}

impl Default for ContractSection {
    fn default() -> Self {
        Self {
            address: default_contract_address(),
            confirmation_poll_ms: default_confirmation_poll_ms(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DappConfig {
    /// `$F20_DAPP_CONFIG`, else `f20-dapp.toml` in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Loads `path`; a file that does not exist means all defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.contract.confirmation_poll_ms)
    }

    pub fn chain_access(&self) -> Result<ChainAccess, ChainError> {
        let wallet = HttpWallet::new(self.wallet.rpc_url.clone())?;
        Ok(ChainAccess::new(
            Arc::new(wallet),
            self.contract.address,
            self.poll_interval(),
        ))
    }
}
