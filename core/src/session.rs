/// Wallet session: the connect handshake and the resulting connection state.
use std::sync::Arc;

use alloy::primitives::Address;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{DappError, Result};
use crate::provider::WalletProvider;

/// Connection state as last reported by the wallet.
///
/// Only the connect handshake writes it. Account switches and disconnects in the wallet
/// are not observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub connected: bool,
    pub chain_id: Option<u64>,
    /// First account returned by the wallet, verbatim. Empty until connected.
    pub account: String,
}

impl SessionState {
    #[must_use]
    pub fn is_fully_connected(&self) -> bool {
        self.connected && self.chain_id.is_some() && !self.account.is_empty()
    }

    /// Parsed active account, requiring a full connection.
    pub fn account_address(&self) -> Result<Address> {
        if !self.is_fully_connected() {
            return Err(DappError::NotConnected);
        }
        self.account.parse::<Address>().map_err(|e| {
            DappError::Provider(format!("Wallet returned an invalid account '{}': {e}", self.account))
        })
    }

    pub fn require_chain_id(&self) -> Result<u64> {
        match (self.is_fully_connected(), self.chain_id) {
            (true, Some(id)) => Ok(id),
            _ => Err(DappError::NotConnected),
        }
    }
}

pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    state: SessionState,
}

impl WalletSession {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.provider
    }

    pub fn is_fully_connected(&self) -> bool {
        self.state.is_fully_connected()
    }

    /// Run the connect handshake. Failures are logged and leave the state untouched.
    pub async fn connect(&mut self) -> bool {
        match self.handshake().await {
            Ok(state) => {
                info!(account = %state.account, chain_id = ?state.chain_id, "wallet connected");
                self.state = state;
                true
            }
            Err(e) => {
                warn!(error = %e, "wallet connect failed");
                false
            }
        }
    }

    async fn handshake(&self) -> Result<SessionState> {
        let accounts = self.provider.request_accounts().await?;
        let account = accounts
            .into_iter()
            .next()
            .ok_or_else(|| DappError::Provider("Wallet returned no accounts".into()))?;
        let chain_id = self.provider.chain_id().await?;
        Ok(SessionState {
            connected: true,
            chain_id: Some(chain_id),
            account,
        })
    }
}
