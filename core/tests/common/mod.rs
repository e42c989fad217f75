//! In-memory wallet provider and node used by the flow tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{hex, Address, Bytes, TxHash, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use serde_json::{json, Value};

use cpc_staking_core::abi::IStakingCpc::{self, DelegateMessage};
use cpc_staking_core::abi::Staking;
use cpc_staking_core::error::{DappError, Result};
use cpc_staking_core::rpc::parse_receipt;
use cpc_staking_core::typed_data;
use cpc_staking_core::{
    DappConfig, NodeClient, StakingService, TransactionReceipt, WalletProvider,
    STAKING_FIXED_ADDRESS,
};

pub const CHAIN_ID: u64 = 9000;
pub const NODE_URL: &str = "http://127.0.0.1:8545";

pub fn tx_hash() -> TxHash {
    "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060"
        .parse()
        .unwrap()
}

pub fn validator() -> Address {
    "0x00000000000000000000000000000000000000bb".parse().unwrap()
}

pub fn one_token() -> U256 {
    U256::from(10u64).pow(U256::from(18u64))
}

/// Wallet holding one local key, answering contract views with fixed values.
pub struct FakeWallet {
    pub key: PrivateKeySigner,
    /// Accounts returned by the handshake; defaults to the key's address.
    pub accounts: Vec<String>,
    pub decimals: u8,
    pub symbol: String,
    pub amount: U256,
    pub validators: Vec<Address>,
    pub revert_calls: bool,
    pub reject_send: bool,
    pub sent: Mutex<Vec<Value>>,
    pub signed: Mutex<Vec<Value>>,
}

impl FakeWallet {
    pub fn new() -> Self {
        let key = PrivateKeySigner::random();
        Self {
            accounts: vec![key.address().to_string()],
            key,
            decimals: 18,
            symbol: "STAKE".into(),
            amount: one_token(),
            validators: vec![validator()],
            revert_calls: false,
            reject_send: false,
            sent: Mutex::new(Vec::new()),
            signed: Mutex::new(Vec::new()),
        }
    }

    pub fn address(&self) -> Address {
        self.key.address()
    }

    /// Calldata of every submitted transaction, in order.
    pub fn sent_calldata(&self) -> Vec<Vec<u8>> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|tx| hex::decode(tx["data"].as_str().unwrap()).unwrap())
            .collect()
    }

    fn eth_call(&self, params: &Value) -> Result<Value> {
        if self.revert_calls {
            return Err(DappError::Provider("JSON-RPC error 3: execution reverted".into()));
        }
        let data = hex::decode(params[0]["data"].as_str().unwrap_or_default())
            .map_err(|e| DappError::Provider(e.to_string()))?;
        let selector: [u8; 4] = data[..4].try_into().unwrap();

        let amount_views = [
            IStakingCpc::delegationOfCall::SELECTOR,
            IStakingCpc::totalDelegationOfCall::SELECTOR,
            IStakingCpc::rewardOfCall::SELECTOR,
            IStakingCpc::rewardsOfCall::SELECTOR,
            IStakingCpc::balanceOfCall::SELECTOR,
        ];
        let out = if selector == IStakingCpc::nameCall::SELECTOR {
            "Staking".to_string().abi_encode()
        } else if selector == IStakingCpc::symbolCall::SELECTOR {
            self.symbol.clone().abi_encode()
        } else if selector == IStakingCpc::decimalsCall::SELECTOR {
            // uint8 occupies a full word
            U256::from(self.decimals).abi_encode()
        } else if selector == IStakingCpc::delegatedValidatorsCall::SELECTOR {
            self.validators.abi_encode()
        } else if amount_views.contains(&selector) {
            self.amount.abi_encode()
        } else {
            return Err(DappError::Provider(format!(
                "unexpected selector 0x{}",
                hex::encode(selector)
            )));
        };
        Ok(Value::String(Bytes::from(out).to_string()))
    }

    fn sign_typed_data(&self, params: &Value) -> Result<Value> {
        let payload: Value = serde_json::from_str(params[1].as_str().unwrap_or_default())?;
        self.signed.lock().unwrap().push(payload.clone());

        let domain = &payload["domain"];
        let message = &payload["message"];
        let chain_id = domain["chainId"].as_u64().unwrap();
        let contract: Address = domain["verifyingContract"].as_str().unwrap().parse().unwrap();
        let text = |key: &str| message[key].as_str().unwrap().to_string();

        let hash = match payload["primaryType"].as_str().unwrap() {
            "Staking" => {
                let msg = Staking {
                    action: text("action"),
                    account: text("account").parse().unwrap(),
                    toValidator: text("toValidator"),
                    fromValidator: text("fromValidator"),
                    amount: text("amount").parse().unwrap(),
                    denom: text("denom"),
                };
                typed_data::signing_hash(chain_id, contract, &msg)
            }
            "DelegateMessage" => {
                let msg = DelegateMessage {
                    action: text("action"),
                    delegator: text("delegator").parse().unwrap(),
                    validator: text("validator"),
                    amount: text("amount").parse().unwrap(),
                    denom: text("denom"),
                };
                let name = domain["name"].as_str().unwrap();
                let domain = typed_data::message_domain(name, chain_id, contract);
                typed_data::delegate_message_hash(&domain, &msg)
            }
            other => {
                return Err(DappError::Provider(format!("unsupported primary type {other}")))
            }
        };
        let signature = self.key.sign_hash_sync(&hash).unwrap();
        Ok(json!(format!("0x{}", hex::encode(signature.as_bytes()))))
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        match method {
            "eth_requestAccounts" | "eth_accounts" => Ok(json!(self.accounts)),
            "eth_chainId" => Ok(json!(format!("0x{CHAIN_ID:x}"))),
            "eth_call" => self.eth_call(&params),
            "eth_sendTransaction" => {
                if self.reject_send {
                    return Err(DappError::Provider(
                        "JSON-RPC error 4001: User denied transaction signature.".into(),
                    ));
                }
                self.sent.lock().unwrap().push(params[0].clone());
                Ok(json!(tx_hash().to_string()))
            }
            "eth_signTypedData_v4" => self.sign_typed_data(&params),
            other => Err(DappError::Provider(format!("unsupported method {other}"))),
        }
    }
}

/// Node whose receipt carries a block number from poll `mined_on` onwards.
pub struct ScriptedNode {
    pub mined_on: Option<u32>,
    pub block: u64,
    pub calls: AtomicU32,
}

impl ScriptedNode {
    pub fn mined_on(poll: u32, block: u64) -> Self {
        Self {
            mined_on: Some(poll),
            block,
            calls: AtomicU32::new(0),
        }
    }

    pub fn never_mined() -> Self {
        Self {
            mined_on: None,
            block: 0,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeClient for ScriptedNode {
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let block = self.mined_on.filter(|m| n >= *m).map(|_| self.block);
        Ok(Some(node_receipt(hash, block)))
    }
}

/// Receipt as a node reports it; pending while `block` is `None`.
pub fn node_receipt(hash: TxHash, block: Option<u64>) -> TransactionReceipt {
    let value = json!({
        "type": "0x2",
        "status": "0x1",
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": hash.to_string(),
        "transactionIndex": block.map(|_| "0x0"),
        "blockHash": block.map(|_| format!("0x{}", "11".repeat(32))),
        "blockNumber": block.map(|b| format!("0x{b:x}")),
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": "0x00000000000000000000000000000000000000aa",
        "to": STAKING_FIXED_ADDRESS.to_string(),
        "contractAddress": null,
    });
    parse_receipt(value).unwrap().unwrap()
}

pub fn test_config() -> DappConfig {
    DappConfig {
        node_url: NODE_URL.into(),
        ..DappConfig::default()
    }
}

pub fn service(wallet: Arc<FakeWallet>, node: Arc<ScriptedNode>) -> StakingService {
    service_with(test_config(), wallet, node)
}

pub fn service_with(
    config: DappConfig,
    wallet: Arc<FakeWallet>,
    node: Arc<ScriptedNode>,
) -> StakingService {
    StakingService::new(config, wallet, node).unwrap()
}

pub async fn connected(wallet: Arc<FakeWallet>, node: Arc<ScriptedNode>) -> StakingService {
    let mut service = service(wallet, node);
    assert!(service.connect().await);
    service
}
