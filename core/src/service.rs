use std::sync::Arc;

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::actions::{MessageContext, ReadAction, ReadValue, WriteAction};
use crate::config::DappConfig;
use crate::contract::AccountSigner;
use crate::error::{DappError, Result};
use crate::invoker::ContractInvoker;
use crate::poller::{PollOutcome, ReceiptPoller};
use crate::provider::{HttpWalletProvider, WalletProvider};
use crate::rpc::{receipt_query_command, JsonRpcClient, NodeClient};
use crate::session::{SessionState, WalletSession};
use crate::state::{BusyFlag, Producer, ResultMessage, ResultSlot};
use crate::typed_data::{self, SignatureParts};

/// A submitted transaction and the background poll watching it.
pub struct WriteOutcome {
    pub hash: TxHash,
    /// Manual receipt lookup, as written to the result slot.
    pub command: String,
    pub poll: JoinHandle<Result<PollOutcome>>,
}

/// Demo typed-data signature as returned by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedSignature {
    pub signature: String,
    pub parts: SignatureParts,
}

/// Local check of a demo typed-data signature against the connected account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub recovered: Address,
    pub expected: Address,
    pub valid: bool,
}

/// Facade over session, invoker and poller sharing one busy flag and one result slot.
pub struct StakingService {
    config: DappConfig,
    staking_address: Address,
    session: WalletSession,
    invoker: ContractInvoker,
    poller: ReceiptPoller,
    results: ResultSlot,
    busy: BusyFlag,
}

impl StakingService {
    pub fn new(
        config: DappConfig,
        provider: Arc<dyn WalletProvider>,
        node: Arc<dyn NodeClient>,
    ) -> Result<Self> {
        config.validate()?;
        let staking_address = config.staking_address()?;
        let busy = BusyFlag::new();
        let results = ResultSlot::new();
        Ok(Self {
            session: WalletSession::new(provider.clone()),
            invoker: ContractInvoker::new(provider, busy.clone()),
            poller: ReceiptPoller::new(node, busy.clone(), results.clone(), config.poll()),
            staking_address,
            config,
            results,
            busy,
        })
    }

    /// Service talking JSON-RPC to the configured node and wallet endpoints.
    pub fn from_config(config: DappConfig) -> Result<Self> {
        let provider = Arc::new(HttpWalletProvider::connect(config.wallet_url())?);
        let node = Arc::new(JsonRpcClient::connect(&config.node_url)?);
        Self::new(config, provider, node)
    }

    pub fn config(&self) -> &DappConfig {
        &self.config
    }

    pub fn staking_address(&self) -> Address {
        self.staking_address
    }

    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn result(&self) -> ResultMessage {
        self.results.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResultMessage> {
        self.results.subscribe()
    }

    /// Run the wallet connect handshake. Failures only show up in the log.
    pub async fn connect(&mut self) -> bool {
        self.session.connect().await
    }

    /// Call a view method and publish the formatted value.
    pub async fn read(&self, action: ReadAction) -> Result<ReadValue> {
        let value = self
            .invoker
            .execute(
                self.session.state(),
                self.staking_address,
                move |contract, signer| async move { action.run(&contract, signer.address()).await },
            )
            .await?;
        self.results.publish(Producer::Invoker, value.to_string());
        Ok(value)
    }

    /// Submit a state-changing call, publish the manual receipt lookup and start polling.
    ///
    /// The poller is started while the invoker still holds the busy flag, so the invoker's
    /// release clears the flag under a running poll.
    pub async fn write(&self, action: WriteAction) -> Result<WriteOutcome> {
        if self.busy.is_busy() {
            return Err(DappError::Busy);
        }
        if matches!(action, WriteAction::Redelegate { .. }) && !self.config.enable_redelegate {
            return Err(DappError::Disabled(
                "redelegate is disabled. Set enable_redelegate in the config to allow it.".into(),
            ));
        }

        let context = MessageContext {
            domain_name: self.config.message_domain_name.clone(),
            denom: self.config.denom.clone(),
            chain_id: self.session.state().chain_id,
        };
        let results = self.results.clone();
        let poller = self.poller.clone();
        let node_url = self.config.node_url.clone();
        self.invoker
            .execute(self.session.state(), self.staking_address, move |contract, _signer| {
                async move {
                    let hash = action.submit(&contract, &context).await?;
                    let command = receipt_query_command(&node_url, hash);
                    results.publish(Producer::Invoker, command.clone());
                    let poll = poller.spawn(hash);
                    Ok(WriteOutcome {
                        hash,
                        command,
                        poll,
                    })
                }
            })
            .await
    }

    /// Ask the wallet to sign the demo staking message and publish its r/s/v split.
    pub async fn delegate_typed(&self) -> Result<TypedSignature> {
        let state = self.session.state();
        let account = state.account_address()?;
        let chain_id = state.require_chain_id()?;

        let message =
            typed_data::demo_message(account, &self.config.demo_validator, &self.config.denom);
        let payload = typed_data::typed_data_payload(chain_id, self.staking_address, &message);
        let signer = AccountSigner::resolve(self.session.provider().clone(), account).await?;
        let signature = signer.sign_typed_data(&payload).await?;
        let parts = typed_data::split_signature(&signature)?;

        info!(account = %account, v = parts.v, "typed data signed");
        self.results.publish(Producer::Signer, parts.to_string());
        Ok(TypedSignature { signature, parts })
    }

    /// Recover the signer of a demo-message signature and compare it to the account.
    pub fn verify_typed(&self, signature: &str) -> Result<Verification> {
        let state = self.session.state();
        let expected = state.account_address()?;
        let chain_id = state.require_chain_id()?;

        let message =
            typed_data::demo_message(expected, &self.config.demo_validator, &self.config.denom);
        let hash = typed_data::signing_hash(chain_id, self.staking_address, &message);
        let recovered = typed_data::split_signature(signature)?.recover(hash)?;
        Ok(Verification {
            recovered,
            expected,
            valid: recovered == expected,
        })
    }

    /// Start the receipt poller for `hash`. Not gated by the busy flag.
    pub fn poll_receipt(&self, hash: TxHash) -> JoinHandle<Result<PollOutcome>> {
        self.poller.spawn(hash)
    }
}
