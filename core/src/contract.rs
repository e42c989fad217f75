/// Contract binding and the account signer it sends transactions with.
use std::sync::Arc;

use alloy::primitives::{hex, Address, Bytes, TxHash, U256};
use alloy::sol_types::SolCall;
use serde_json::{json, Value};
use tracing::info;

use crate::abi::IStakingCpc::{self, DelegateMessage};
use crate::abi::EIP712Domain;
use crate::error::{DappError, Result};
use crate::provider::WalletProvider;
use crate::typed_data;

/// Signer for one wallet account. Signing happens inside the wallet; this only routes
/// requests on behalf of `address`.
#[derive(Clone)]
pub struct AccountSigner {
    address: Address,
    provider: Arc<dyn WalletProvider>,
}

impl AccountSigner {
    /// Resolve a signer for `account`, which the provider must currently expose.
    pub async fn resolve(provider: Arc<dyn WalletProvider>, account: Address) -> Result<Self> {
        let accounts = provider.accounts().await?;
        let available = accounts
            .iter()
            .filter_map(|a| a.parse::<Address>().ok())
            .any(|a| a == account);
        if !available {
            return Err(DappError::Provider(format!(
                "Wallet cannot sign for account {account}"
            )));
        }
        Ok(Self { address: account, provider })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.provider
    }

    /// Submit a transaction from this account and return its hash.
    pub async fn send_transaction(&self, to: Address, data: Bytes) -> Result<TxHash> {
        let tx = json!({
            "from": self.address.to_string(),
            "to": to.to_string(),
            "data": data.to_string(),
        });
        let value = self.provider.request("eth_sendTransaction", json!([tx])).await?;
        parse_hash(&value)
    }

    /// Request an `eth_signTypedData_v4` signature over `typed_data`.
    pub async fn sign_typed_data(&self, typed_data: &Value) -> Result<String> {
        let payload = serde_json::to_string(typed_data)?;
        let value = self
            .provider
            .request(
                "eth_signTypedData_v4",
                json!([self.address.to_string(), payload]),
            )
            .await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DappError::Provider(format!("Unexpected signature response: {value}")))
    }
}

/// Callable binding over the staking contract at one address.
#[derive(Clone)]
pub struct StakingContract {
    address: Address,
    signer: AccountSigner,
}

impl StakingContract {
    pub fn new(address: Address, signer: AccountSigner) -> Self {
        Self { address, signer }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> &AccountSigner {
        &self.signer
    }

    async fn call<C: SolCall>(&self, call: C) -> Result<Bytes> {
        let request = json!({
            "from": self.signer.address().to_string(),
            "to": self.address.to_string(),
            "data": Bytes::from(call.abi_encode()).to_string(),
        });
        let value = self
            .signer
            .provider()
            .request("eth_call", json!([request, "latest"]))
            .await?;
        parse_bytes(&value)
    }

    async fn send<C: SolCall>(&self, call: C) -> Result<TxHash> {
        let hash = self
            .signer
            .send_transaction(self.address, call.abi_encode().into())
            .await?;
        info!(method = C::SIGNATURE, tx = %hash, "transaction submitted");
        Ok(hash)
    }

    async fn read<C: SolCall>(&self, call: C) -> Result<C::Return> {
        let out = self.call(call).await?;
        Ok(C::abi_decode_returns(&out)?)
    }

    pub async fn name(&self) -> Result<String> {
        self.read(IStakingCpc::nameCall {}).await
    }

    pub async fn symbol(&self) -> Result<String> {
        self.read(IStakingCpc::symbolCall {}).await
    }

    pub async fn decimals(&self) -> Result<u8> {
        self.read(IStakingCpc::decimalsCall {}).await
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        self.read(IStakingCpc::balanceOfCall { account }).await
    }

    pub async fn delegated_validators(&self, delegator: Address) -> Result<Vec<Address>> {
        self.read(IStakingCpc::delegatedValidatorsCall { delegator }).await
    }

    pub async fn delegation_of(&self, delegator: Address, validator: Address) -> Result<U256> {
        self.read(IStakingCpc::delegationOfCall { delegator, validator })
            .await
    }

    pub async fn total_delegation_of(&self, delegator: Address) -> Result<U256> {
        self.read(IStakingCpc::totalDelegationOfCall { delegator }).await
    }

    pub async fn reward_of(&self, delegator: Address, validator: Address) -> Result<U256> {
        self.read(IStakingCpc::rewardOfCall { delegator, validator }).await
    }

    pub async fn rewards_of(&self, delegator: Address) -> Result<U256> {
        self.read(IStakingCpc::rewardsOfCall { delegator }).await
    }

    pub async fn delegate(&self, validator: Address, amount: U256) -> Result<TxHash> {
        self.send(IStakingCpc::delegateCall { validator, amount }).await
    }

    pub async fn undelegate(&self, validator: Address, amount: U256) -> Result<TxHash> {
        self.send(IStakingCpc::undelegateCall { validator, amount }).await
    }

    pub async fn redelegate(
        &self,
        src_validator: Address,
        dst_validator: Address,
        amount: U256,
    ) -> Result<TxHash> {
        self.send(IStakingCpc::redelegateCall {
            srcValidator: src_validator,
            dstValidator: dst_validator,
            amount,
        })
        .await
    }

    pub async fn withdraw_reward(&self, validator: Address) -> Result<TxHash> {
        self.send(IStakingCpc::withdrawRewardCall { validator }).await
    }

    pub async fn withdraw_rewards(&self) -> Result<TxHash> {
        self.send(IStakingCpc::withdrawRewardsCall {}).await
    }

    /// Have the wallet sign `message` under `domain`, then submit it with the r/s/v split.
    pub async fn delegate_by_message(
        &self,
        domain: &EIP712Domain,
        message: DelegateMessage,
    ) -> Result<TxHash> {
        let payload = typed_data::delegate_message_payload(domain, &message);
        let signature = self.signer.sign_typed_data(&payload).await?;
        let parts = typed_data::split_signature(&signature)?;
        let (r, s) = parts.words()?;
        self.send(IStakingCpc::delegateByMessageCall {
            message,
            r,
            s,
            v: parts.v,
        })
        .await
    }
}

fn parse_bytes(value: &Value) -> Result<Bytes> {
    let s = value
        .as_str()
        .ok_or_else(|| DappError::Provider(format!("Unexpected eth_call response: {value}")))?;
    hex::decode(s)
        .map(Bytes::from)
        .map_err(|e| DappError::Provider(format!("Invalid eth_call output '{s}': {e}")))
}

fn parse_hash(value: &Value) -> Result<TxHash> {
    let s = value
        .as_str()
        .ok_or_else(|| DappError::Provider(format!("Unexpected transaction hash: {value}")))?;
    s.parse::<TxHash>()
        .map_err(|e| DappError::Provider(format!("Invalid transaction hash '{s}': {e}")))
}
