use std::path::PathBuf;

use anyhow::Context;

pub mod abi;
pub mod actions;
pub mod commands;
pub mod config;
pub mod contract;
pub mod display;
pub mod error;
pub mod invoker;
pub mod poller;
pub mod provider;
pub mod rpc;
pub mod service;
pub mod session;
pub mod state;
pub mod typed_data;

pub use actions::{ReadAction, ReadValue, WriteAction};
pub use commands::Command;
pub use config::{DappConfig, PollConfig, STAKING_FIXED_ADDRESS};
pub use error::DappError;
pub use poller::{PollOutcome, ReceiptPoller};
pub use provider::{HttpWalletProvider, WalletProvider};
pub use rpc::{JsonRpcClient, NodeClient, TransactionReceipt};
pub use service::StakingService;
pub use session::{SessionState, WalletSession};
pub use state::{BusyFlag, Producer, ResultMessage, ResultSlot};

pub use alloy::primitives::{Address, TxHash, U256};

/// XDG-compliant data directory for the client config.
/// Linux: `~/.local/share/cpc-staking/`, macOS: `~/Library/Application Support/cpc-staking/`
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Cannot determine data directory")?
        .join("cpc-staking");
    Ok(dir)
}

/// Default config file location inside [`data_dir`].
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(data_dir()?.join("config.json"))
}
