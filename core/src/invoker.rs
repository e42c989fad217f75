/// Contract invoker: resolves a signer, builds the binding and runs one action under
/// the busy flag.
use std::future::Future;
use std::sync::Arc;

use alloy::primitives::Address;

use crate::contract::{AccountSigner, StakingContract};
use crate::error::Result;
use crate::provider::WalletProvider;
use crate::session::SessionState;
use crate::state::BusyFlag;

pub struct ContractInvoker {
    provider: Arc<dyn WalletProvider>,
    busy: BusyFlag,
}

impl ContractInvoker {
    pub fn new(provider: Arc<dyn WalletProvider>, busy: BusyFlag) -> Self {
        Self { provider, busy }
    }

    /// Run `action` against the contract at `address` with a signer for the session's
    /// account. The busy flag is raised for the whole call and cleared on every exit path,
    /// errors included; errors are returned unchanged.
    pub async fn execute<T, F, Fut>(
        &self,
        session: &SessionState,
        address: Address,
        action: F,
    ) -> Result<T>
    where
        F: FnOnce(StakingContract, AccountSigner) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let _busy = self.busy.engage();
        let account = session.account_address()?;
        let signer = AccountSigner::resolve(self.provider.clone(), account).await?;
        let contract = StakingContract::new(address, signer.clone());
        action(contract, signer).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DappError;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    const ACCOUNT: &str = "0x00000000000000000000000000000000000000aa";

    struct Accounts(Value);

    #[async_trait]
    impl WalletProvider for Accounts {
        async fn request(&self, method: &str, _params: Value) -> Result<Value> {
            match method {
                "eth_accounts" => Ok(self.0.clone()),
                other => Err(DappError::Provider(format!("unsupported {other}"))),
            }
        }
    }

    fn connected() -> SessionState {
        SessionState {
            connected: true,
            chain_id: Some(1),
            account: ACCOUNT.into(),
        }
    }

    #[tokio::test]
    async fn busy_is_raised_during_and_cleared_after_success() {
        let busy = BusyFlag::new();
        let invoker = ContractInvoker::new(Arc::new(Accounts(json!([ACCOUNT]))), busy.clone());
        assert!(!busy.is_busy());

        let observed = busy.clone();
        let seen = invoker
            .execute(&connected(), Address::ZERO, |contract, signer| async move {
                assert_eq!(signer.address(), ACCOUNT.parse::<Address>().unwrap());
                assert_eq!(contract.address(), Address::ZERO);
                Ok(observed.is_busy())
            })
            .await
            .unwrap();

        assert!(seen);
        assert!(!busy.is_busy());
    }

    #[tokio::test]
    async fn busy_is_cleared_after_action_error() {
        let busy = BusyFlag::new();
        let invoker = ContractInvoker::new(Arc::new(Accounts(json!([ACCOUNT]))), busy.clone());

        let err = invoker
            .execute(&connected(), Address::ZERO, |_, _| async {
                Err::<(), _>(DappError::Provider("execution reverted".into()))
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("reverted"));
        assert!(!busy.is_busy());
    }

    #[tokio::test]
    async fn signer_resolution_failure_propagates() {
        let busy = BusyFlag::new();
        let invoker = ContractInvoker::new(Arc::new(Accounts(json!([]))), busy.clone());

        let res = invoker
            .execute(&connected(), Address::ZERO, |_, _| async { Ok(()) })
            .await;

        assert!(matches!(res, Err(DappError::Provider(_))));
        assert!(!busy.is_busy());
    }

    #[tokio::test]
    async fn disconnected_session_is_rejected() {
        let busy = BusyFlag::new();
        let invoker = ContractInvoker::new(Arc::new(Accounts(json!([ACCOUNT]))), busy.clone());

        let res = invoker
            .execute(&SessionState::default(), Address::ZERO, |_, _| async { Ok(()) })
            .await;

        assert!(matches!(res, Err(DappError::NotConnected)));
        assert!(!busy.is_busy());
    }
}
