//! JSON-RPC plumbing for the node and the HTTP-backed wallet provider.

use std::borrow::Cow;

use alloy::primitives::TxHash;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

pub use alloy::rpc::types::TransactionReceipt;

use crate::error::{DappError, Result};

/// Node-side queries needed by the receipt poller.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// Fetch the receipt for `hash`. `None` while the node does not know the transaction.
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>>;
}

/// JSON-RPC client over HTTP, backed by an alloy provider.
pub struct JsonRpcClient {
    provider: DynProvider,
    url: String,
}

impl JsonRpcClient {
    pub fn connect(url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .connect_http(
                url.parse()
                    .map_err(|e| DappError::Config(format!("Invalid endpoint URL '{url}': {e}")))?,
            )
            .erased();
        Ok(Self {
            provider,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and return its `result` member.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
        debug!(method, url = %self.url, "json-rpc request");
        let value = self
            .provider
            .raw_request::<Value, Value>(Cow::Owned(method.to_string()), params)
            .await?;
        Ok(value)
    }
}

#[async_trait]
impl NodeClient for JsonRpcClient {
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        debug!(tx = %hash, url = %self.url, "eth_getTransactionReceipt");
        Ok(self.provider.get_transaction_receipt(hash).await?)
    }
}

/// A receipt only counts once the node reports the block that included it.
pub fn is_mined(receipt: &TransactionReceipt) -> bool {
    receipt.block_number.is_some()
}

/// Indented JSON rendering of the full receipt, as written to the result slot.
pub fn pretty_receipt(receipt: &TransactionReceipt) -> String {
    serde_json::to_string_pretty(receipt).unwrap_or_else(|_| format!("{receipt:?}"))
}

/// Decode an `eth_getTransactionReceipt` result, where `null` means unknown.
pub fn parse_receipt(value: Value) -> Result<Option<TransactionReceipt>> {
    Ok(serde_json::from_value(value)?)
}

/// Copyable shell command that performs the same receipt lookup by hand.
#[must_use]
pub fn receipt_query_command(node_url: &str, hash: TxHash) -> String {
    let body = format!(
        r#"{{"jsonrpc":"2.0","method":"eth_getTransactionReceipt","params":["{hash}"],"id":1}}"#
    );
    format!("curl -X POST --data '{body}' -H \"Content-Type: application/json\" {node_url}")
}
