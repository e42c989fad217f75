//! Domain error type for staking client operations.

use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

/// Typed error enum for client operations.
///
/// Provider rejections, transport failures and contract reverts are not told apart: the
/// wallet and the node report them all as JSON-RPC errors, which end up in `Provider`.
#[derive(Debug, Error)]
pub enum DappError {
    /// No fully connected wallet session.
    #[error("Wallet is not connected. Run 'connect' first.")]
    NotConnected,

    /// A contract call is already in flight.
    #[error("Another contract call is in flight. Try again when it completes.")]
    Busy,

    /// The action exists but is switched off in configuration.
    #[error("{0}")]
    Disabled(String),

    /// Wallet provider or JSON-RPC error response.
    #[error("{0}")]
    Provider(String),

    /// HTTP transport or malformed JSON-RPC payload.
    #[error("{0}")]
    Rpc(String),

    /// ABI encoding or decoding failure.
    #[error("{0}")]
    Abi(String),

    /// Signature could not be parsed or recovered.
    #[error("{0}")]
    InvalidSignature(String),

    /// Invalid address, amount or hash supplied by the user.
    #[error("{0}")]
    InvalidInput(String),

    /// Invalid or unreadable configuration.
    #[error("{0}")]
    Config(String),

    /// Unexpected error from internal subsystems.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RpcError<TransportErrorKind>> for DappError {
    fn from(e: RpcError<TransportErrorKind>) -> Self {
        match e.as_error_resp() {
            Some(payload) => DappError::Provider(format!(
                "JSON-RPC error {}: {}",
                payload.code, payload.message
            )),
            None => DappError::Rpc(format!("Node request failed: {e}")),
        }
    }
}

impl From<serde_json::Error> for DappError {
    fn from(e: serde_json::Error) -> Self {
        DappError::Rpc(format!("Malformed JSON-RPC payload: {e}"))
    }
}

impl From<alloy::sol_types::Error> for DappError {
    fn from(e: alloy::sol_types::Error) -> Self {
        DappError::Abi(format!("Failed to decode contract response: {e}"))
    }
}

/// Alias for `std::result::Result<T, DappError>`.
pub type Result<T> = std::result::Result<T, DappError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;

    #[test]
    fn error_response_maps_to_provider_error() {
        let payload: ErrorPayload = serde_json::from_str(
            r#"{"code":4001,"message":"User rejected the request."}"#,
        )
        .unwrap();
        let err: DappError = RpcError::<TransportErrorKind>::ErrorResp(payload).into();
        assert!(matches!(err, DappError::Provider(_)));
        assert_eq!(err.to_string(), "JSON-RPC error 4001: User rejected the request.");
    }

    #[test]
    fn transport_failure_maps_to_rpc_error() {
        let err: DappError = TransportErrorKind::custom_str("connection refused").into();
        assert!(matches!(err, DappError::Rpc(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
