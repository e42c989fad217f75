/// Command definitions and parsing for the staking REPL and one-shot mode.
mod execute;
mod help;
mod parse;

pub use help::help_text;

use alloy::primitives::{Address, TxHash};

use crate::actions::{ReadAction, WriteAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect the wallet: connect
    Connect,
    /// Show session state and busy flag
    Status,
    /// Show the current result slot
    Result,
    /// Contract name
    Name,
    /// Token symbol
    Symbol,
    /// Token decimals
    Decimals,
    /// Validators the delegator has stake with: delegated_validators [delegator]
    DelegatedValidators { delegator: Option<Address> },
    /// Stake with one validator: delegation_of <validator> [delegator]
    DelegationOf {
        validator: Address,
        delegator: Option<Address>,
    },
    /// Stake across all validators: total_delegation_of [delegator]
    TotalDelegationOf { delegator: Option<Address> },
    /// Pending reward from one validator: reward_of <validator> [delegator]
    RewardOf {
        validator: Address,
        delegator: Option<Address>,
    },
    /// Pending rewards from all validators: rewards_of [delegator]
    RewardsOf { delegator: Option<Address> },
    /// Token balance: balance_of [account]
    BalanceOf { account: Option<Address> },
    /// Delegate tokens: delegate <validator> <amount>
    Delegate { validator: Address, amount: String },
    /// Undelegate tokens: undelegate <validator> <amount>
    Undelegate { validator: Address, amount: String },
    /// Move stake between validators: redelegate <src> <dst> <amount>
    Redelegate {
        src_validator: Address,
        dst_validator: Address,
        amount: String,
    },
    /// Claim the reward from one validator: withdraw_reward <validator>
    WithdrawReward { validator: Address },
    /// Claim all rewards
    WithdrawRewards,
    /// Delegate through a signed message: delegate_by_message <validator_bech32> <amount>
    DelegateByMessage { validator: String, amount: String },
    /// Sign the demo staking message and split the signature
    DelegateTyped,
    /// Check a demo-message signature: verify_typed <signature>
    VerifyTyped { signature: String },
    /// Poll for a transaction receipt: receipt <tx_hash>
    Receipt { hash: TxHash },
    /// Print help
    Help { command: Option<String> },
    /// Exit the client
    Exit,
}

impl Command {
    /// The contract view call behind this command, if any.
    pub fn read_action(&self) -> Option<ReadAction> {
        let action = match *self {
            Command::Name => ReadAction::Name,
            Command::Symbol => ReadAction::Symbol,
            Command::Decimals => ReadAction::Decimals,
            Command::DelegatedValidators { delegator } => {
                ReadAction::DelegatedValidators { delegator }
            }
            Command::DelegationOf {
                validator,
                delegator,
            } => ReadAction::DelegationOf {
                validator,
                delegator,
            },
            Command::TotalDelegationOf { delegator } => ReadAction::TotalDelegationOf { delegator },
            Command::RewardOf {
                validator,
                delegator,
            } => ReadAction::RewardOf {
                validator,
                delegator,
            },
            Command::RewardsOf { delegator } => ReadAction::RewardsOf { delegator },
            Command::BalanceOf { account } => ReadAction::BalanceOf { account },
            _ => return None,
        };
        Some(action)
    }

    /// The state-changing contract call behind this command, if any.
    pub fn write_action(&self) -> Option<WriteAction> {
        let action = match self {
            Command::Delegate { validator, amount } => WriteAction::Delegate {
                validator: *validator,
                amount: amount.clone(),
            },
            Command::Undelegate { validator, amount } => WriteAction::Undelegate {
                validator: *validator,
                amount: amount.clone(),
            },
            Command::Redelegate {
                src_validator,
                dst_validator,
                amount,
            } => WriteAction::Redelegate {
                src_validator: *src_validator,
                dst_validator: *dst_validator,
                amount: amount.clone(),
            },
            Command::WithdrawReward { validator } => WriteAction::WithdrawReward {
                validator: *validator,
            },
            Command::WithdrawRewards => WriteAction::WithdrawRewards,
            Command::DelegateByMessage { validator, amount } => WriteAction::DelegateByMessage {
                validator: validator.clone(),
                amount: amount.clone(),
            },
            _ => return None,
        };
        Some(action)
    }

    /// Whether this command starts a receipt poll in the background.
    pub fn starts_poll(&self) -> bool {
        self.write_action().is_some() || matches!(self, Command::Receipt { .. })
    }

    /// Returns a confirmation prompt if this command should ask before executing.
    pub fn confirmation_prompt(&self) -> Option<String> {
        match self {
            Command::Delegate { validator, amount } => {
                Some(format!("Delegate {amount} to validator {validator}?"))
            }
            Command::Undelegate { validator, amount } => {
                Some(format!("Undelegate {amount} from validator {validator}?"))
            }
            Command::Redelegate {
                src_validator,
                dst_validator,
                amount,
            } => Some(format!(
                "Redelegate {amount} from {src_validator} to {dst_validator}?"
            )),
            Command::WithdrawReward { validator } => {
                Some(format!("Withdraw the reward from validator {validator}?"))
            }
            Command::WithdrawRewards => Some("Withdraw rewards from all validators?".to_string()),
            Command::DelegateByMessage { validator, amount } => Some(format!(
                "Sign a delegation of {amount} to {validator} and submit it?"
            )),
            Command::DelegateTyped => {
                Some("Ask the wallet to sign the demo staking message?".to_string())
            }
            _ => None,
        }
    }
}
