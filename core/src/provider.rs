//! Wallet provider boundary.
//!
//! Mirrors the EIP-1193 `request({method, params})` surface of a browser wallet so the
//! session, the contract binding and the typed-data signer can all run against either a
//! JSON-RPC endpoint with unlocked accounts or an in-memory fake.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{DappError, Result};
use crate::rpc::JsonRpcClient;

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Forward a raw request to the wallet.
    async fn request(&self, method: &str, params: Value) -> Result<Value>;

    /// Ask the wallet to expose its accounts (the connect prompt).
    async fn request_accounts(&self) -> Result<Vec<String>> {
        let value = self.request("eth_requestAccounts", Value::Array(vec![])).await?;
        string_list(value)
    }

    /// Accounts the wallet can currently sign for.
    async fn accounts(&self) -> Result<Vec<String>> {
        let value = self.request("eth_accounts", Value::Array(vec![])).await?;
        string_list(value)
    }

    async fn chain_id(&self) -> Result<u64> {
        let value = self.request("eth_chainId", Value::Array(vec![])).await?;
        parse_quantity(&value)
    }
}

/// Wallet provider backed by a JSON-RPC endpoint that manages unlocked accounts,
/// such as a dev node or a local signing proxy.
pub struct HttpWalletProvider {
    client: JsonRpcClient,
}

impl HttpWalletProvider {
    pub fn connect(url: &str) -> Result<Self> {
        Ok(Self {
            client: JsonRpcClient::connect(url)?,
        })
    }

    pub fn url(&self) -> &str {
        self.client.url()
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.client.request(method, params).await
    }

    // Nodes do not implement the interactive prompt; listing is the handshake.
    async fn request_accounts(&self) -> Result<Vec<String>> {
        self.accounts().await
    }
}

fn string_list(value: Value) -> Result<Vec<String>> {
    serde_json::from_value(value)
        .map_err(|e| DappError::Provider(format!("Unexpected accounts response: {e}")))
}

/// Parse a JSON-RPC quantity, hex string or plain number.
pub fn parse_quantity(value: &Value) -> Result<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| DappError::Provider(format!("Quantity out of range: {n}"))),
        Value::String(s) => {
            let parsed = match s.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse::<u64>(),
            };
            parsed.map_err(|e| DappError::Provider(format!("Invalid quantity '{s}': {e}")))
        }
        other => Err(DappError::Provider(format!("Unexpected quantity: {other}"))),
    }
}
