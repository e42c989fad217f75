/// Staking contract actions as plain data, plus the values read actions produce.
use std::fmt;

use alloy::primitives::{Address, TxHash, U256};
use futures::future::try_join;
use serde_json::json;

use crate::contract::StakingContract;
use crate::display;
use crate::error::{DappError, Result};
use crate::typed_data;

/// View methods. `None` account arguments default to the connected account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadAction {
    Name,
    Symbol,
    Decimals,
    DelegatedValidators {
        delegator: Option<Address>,
    },
    DelegationOf {
        validator: Address,
        delegator: Option<Address>,
    },
    TotalDelegationOf {
        delegator: Option<Address>,
    },
    RewardOf {
        validator: Address,
        delegator: Option<Address>,
    },
    RewardsOf {
        delegator: Option<Address>,
    },
    BalanceOf {
        account: Option<Address>,
    },
}

impl ReadAction {
    /// Contract method name, as in the interface.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Symbol => "symbol",
            Self::Decimals => "decimals",
            Self::DelegatedValidators { .. } => "delegatedValidators",
            Self::DelegationOf { .. } => "delegationOf",
            Self::TotalDelegationOf { .. } => "totalDelegationOf",
            Self::RewardOf { .. } => "rewardOf",
            Self::RewardsOf { .. } => "rewardsOf",
            Self::BalanceOf { .. } => "balanceOf",
        }
    }

    /// Run against `contract`, with `account` standing in for omitted account arguments.
    pub(crate) async fn run(&self, contract: &StakingContract, account: Address) -> Result<ReadValue> {
        match *self {
            Self::Name => Ok(ReadValue::Text(contract.name().await?)),
            Self::Symbol => Ok(ReadValue::Text(contract.symbol().await?)),
            Self::Decimals => Ok(ReadValue::Decimals(contract.decimals().await?)),
            Self::DelegatedValidators { delegator } => Ok(ReadValue::Validators(
                contract
                    .delegated_validators(delegator.unwrap_or(account))
                    .await?,
            )),
            Self::DelegationOf {
                validator,
                delegator,
            } => {
                let raw = contract
                    .delegation_of(delegator.unwrap_or(account), validator)
                    .await?;
                amount(contract, raw).await
            }
            Self::TotalDelegationOf { delegator } => {
                let raw = contract
                    .total_delegation_of(delegator.unwrap_or(account))
                    .await?;
                amount(contract, raw).await
            }
            Self::RewardOf {
                validator,
                delegator,
            } => {
                let raw = contract
                    .reward_of(delegator.unwrap_or(account), validator)
                    .await?;
                amount(contract, raw).await
            }
            Self::RewardsOf { delegator } => {
                let raw = contract.rewards_of(delegator.unwrap_or(account)).await?;
                amount(contract, raw).await
            }
            Self::BalanceOf { account: holder } => {
                let raw = contract.balance_of(holder.unwrap_or(account)).await?;
                amount(contract, raw).await
            }
        }
    }
}

async fn amount(contract: &StakingContract, raw: U256) -> Result<ReadValue> {
    let (decimals, symbol) = try_join(contract.decimals(), contract.symbol()).await?;
    Ok(ReadValue::Amount {
        raw,
        decimals,
        symbol,
    })
}

/// Value returned by a read action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadValue {
    Text(String),
    Decimals(u8),
    Validators(Vec<Address>),
    /// Token amount with the contract's own decimals and symbol.
    Amount {
        raw: U256,
        decimals: u8,
        symbol: String,
    },
}

impl ReadValue {
    pub fn to_json(&self) -> String {
        match self {
            Self::Text(text) => json!({ "value": text }).to_string(),
            Self::Decimals(d) => json!({ "value": d }).to_string(),
            Self::Validators(list) => json!({
                "validators": list.iter().map(|a| a.to_string()).collect::<Vec<_>>(),
            })
            .to_string(),
            Self::Amount {
                raw,
                decimals,
                symbol,
            } => display::format_amount_json(*raw, *decimals, symbol),
        }
    }
}

impl fmt::Display for ReadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Decimals(d) => write!(f, "{d}"),
            Self::Validators(list) => write!(f, "{}", display::format_address_list(list)),
            Self::Amount {
                raw,
                decimals,
                symbol,
            } => write!(f, "{}", display::format_token_amount(*raw, *decimals, symbol)),
        }
    }
}

/// State-changing methods. Amounts stay as typed until the contract's decimals are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteAction {
    Delegate {
        validator: Address,
        amount: String,
    },
    Undelegate {
        validator: Address,
        amount: String,
    },
    Redelegate {
        src_validator: Address,
        dst_validator: Address,
        amount: String,
    },
    WithdrawReward {
        validator: Address,
    },
    WithdrawRewards,
    /// Delegation carried by a signed `DelegateMessage`; `validator` is the bech32 operator
    /// address.
    DelegateByMessage {
        validator: String,
        amount: String,
    },
}

/// Signing inputs for writes that carry an EIP-712 message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContext {
    pub domain_name: String,
    pub denom: String,
    pub chain_id: Option<u64>,
}

impl WriteAction {
    pub fn method(&self) -> &'static str {
        match self {
            Self::Delegate { .. } => "delegate",
            Self::Undelegate { .. } => "undelegate",
            Self::Redelegate { .. } => "redelegate",
            Self::WithdrawReward { .. } => "withdrawReward",
            Self::WithdrawRewards => "withdrawRewards",
            Self::DelegateByMessage { .. } => "delegateByMessage",
        }
    }

    /// Encode and submit through `contract`, returning the transaction hash.
    pub(crate) async fn submit(
        &self,
        contract: &StakingContract,
        context: &MessageContext,
    ) -> Result<TxHash> {
        match self {
            Self::Delegate { validator, amount } => {
                let amount = parse_amount(contract, amount).await?;
                contract.delegate(*validator, amount).await
            }
            Self::Undelegate { validator, amount } => {
                let amount = parse_amount(contract, amount).await?;
                contract.undelegate(*validator, amount).await
            }
            Self::Redelegate {
                src_validator,
                dst_validator,
                amount,
            } => {
                let amount = parse_amount(contract, amount).await?;
                contract
                    .redelegate(*src_validator, *dst_validator, amount)
                    .await
            }
            Self::WithdrawReward { validator } => contract.withdraw_reward(*validator).await,
            Self::WithdrawRewards => contract.withdraw_rewards().await,
            Self::DelegateByMessage { validator, amount } => {
                let chain_id = context.chain_id.ok_or(DappError::NotConnected)?;
                let amount = parse_amount(contract, amount).await?;
                let domain = typed_data::message_domain(
                    &context.domain_name,
                    chain_id,
                    contract.address(),
                );
                let message = typed_data::delegate_message(
                    contract.signer().address(),
                    validator,
                    amount,
                    &context.denom,
                );
                contract.delegate_by_message(&domain, message).await
            }
        }
    }
}

async fn parse_amount(contract: &StakingContract, amount: &str) -> Result<U256> {
    let decimals = contract.decimals().await?;
    let parsed = display::parse_units(amount, decimals)
        .map_err(|e| DappError::InvalidInput(format!("Invalid amount '{amount}': {e}")))?;
    if parsed.is_zero() {
        return Err(DappError::InvalidInput("Amount must be greater than 0.".into()));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_value_displays_with_symbol() {
        let value = ReadValue::Amount {
            raw: U256::from(10u64).pow(U256::from(18u64)),
            decimals: 18,
            symbol: "STAKE".into(),
        };
        assert_eq!(value.to_string(), "1.0 STAKE");
    }

    #[test]
    fn validators_json_lists_addresses() {
        let value = ReadValue::Validators(vec![Address::ZERO]);
        let v: serde_json::Value = serde_json::from_str(&value.to_json()).unwrap();
        assert_eq!(v["validators"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn method_names_follow_interface() {
        assert_eq!(
            ReadAction::TotalDelegationOf { delegator: None }.method(),
            "totalDelegationOf"
        );
        assert_eq!(WriteAction::WithdrawRewards.method(), "withdrawRewards");
        assert_eq!(
            WriteAction::DelegateByMessage {
                validator: "evmvaloper1xyz".into(),
                amount: "1".into(),
            }
            .method(),
            "delegateByMessage"
        );
    }
}
