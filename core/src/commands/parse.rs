use anyhow::{bail, Context, Result};
use alloy::primitives::{Address, TxHash};

use super::Command;

impl Command {
    /// Parse a command from a raw input string.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            bail!("No command entered. Type 'help' for a list of commands.");
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();
        let arg = |i: usize| args.get(i).copied();

        match cmd.as_str() {
            "connect" => Ok(Command::Connect),

            "status" => Ok(Command::Status),

            "result" | "res" => Ok(Command::Result),

            "name" => Ok(Command::Name),

            "symbol" => Ok(Command::Symbol),

            "decimals" => Ok(Command::Decimals),

            "delegated_validators" | "validators" => Ok(Command::DelegatedValidators {
                delegator: optional_address(arg(0), "delegator")?,
            }),

            "delegation_of" | "delegation" => {
                let validator = arg(0).ok_or_else(|| {
                    anyhow::anyhow!("Missing validator. Usage: delegation_of <validator> [delegator]")
                })?;
                Ok(Command::DelegationOf {
                    validator: parse_address(validator, "validator")?,
                    delegator: optional_address(arg(1), "delegator")?,
                })
            }

            "total_delegation_of" | "total_delegation" => Ok(Command::TotalDelegationOf {
                delegator: optional_address(arg(0), "delegator")?,
            }),

            "reward_of" | "reward" => {
                let validator = arg(0).ok_or_else(|| {
                    anyhow::anyhow!("Missing validator. Usage: reward_of <validator> [delegator]")
                })?;
                Ok(Command::RewardOf {
                    validator: parse_address(validator, "validator")?,
                    delegator: optional_address(arg(1), "delegator")?,
                })
            }

            "rewards_of" | "rewards" => Ok(Command::RewardsOf {
                delegator: optional_address(arg(0), "delegator")?,
            }),

            "balance_of" | "balance" | "bal" => Ok(Command::BalanceOf {
                account: optional_address(arg(0), "account")?,
            }),

            "delegate" => {
                let validator = arg(0).ok_or_else(|| {
                    anyhow::anyhow!("Missing validator. Usage: delegate <validator> <amount>")
                })?;
                let amount = arg(1).ok_or_else(|| {
                    anyhow::anyhow!("Missing amount. Usage: delegate <validator> <amount>")
                })?;
                Ok(Command::Delegate {
                    validator: parse_address(validator, "validator")?,
                    amount: validate_amount(amount)?,
                })
            }

            "undelegate" => {
                let validator = arg(0).ok_or_else(|| {
                    anyhow::anyhow!("Missing validator. Usage: undelegate <validator> <amount>")
                })?;
                let amount = arg(1).ok_or_else(|| {
                    anyhow::anyhow!("Missing amount. Usage: undelegate <validator> <amount>")
                })?;
                Ok(Command::Undelegate {
                    validator: parse_address(validator, "validator")?,
                    amount: validate_amount(amount)?,
                })
            }

            "redelegate" => {
                let usage = "Usage: redelegate <src_validator> <dst_validator> <amount>";
                let (src, dst, amount) = match (arg(0), arg(1), arg(2)) {
                    (Some(s), Some(d), Some(a)) => (s, d, a),
                    (None, _, _) => bail!("Missing source validator. {usage}"),
                    (_, None, _) => bail!("Missing destination validator. {usage}"),
                    (_, _, None) => bail!("Missing amount. {usage}"),
                };
                Ok(Command::Redelegate {
                    src_validator: parse_address(src, "source validator")?,
                    dst_validator: parse_address(dst, "destination validator")?,
                    amount: validate_amount(amount)?,
                })
            }

            "withdraw_reward" => {
                let validator = arg(0).ok_or_else(|| {
                    anyhow::anyhow!("Missing validator. Usage: withdraw_reward <validator>")
                })?;
                Ok(Command::WithdrawReward {
                    validator: parse_address(validator, "validator")?,
                })
            }

            "withdraw_rewards" | "withdraw" => Ok(Command::WithdrawRewards),

            "delegate_by_message" | "delegate_signed" => {
                let usage = "Usage: delegate_by_message <validator_bech32> <amount>";
                let (validator, amount) = match (arg(0), arg(1)) {
                    (Some(v), Some(a)) => (v, a),
                    (None, _) => bail!("Missing validator. {usage}"),
                    (_, None) => bail!("Missing amount. {usage}"),
                };
                if validator.starts_with("0x") {
                    bail!("Validator must be a bech32 operator address. {usage}");
                }
                Ok(Command::DelegateByMessage {
                    validator: validator.to_string(),
                    amount: validate_amount(amount)?,
                })
            }

            "delegate_typed" | "sign_typed" => Ok(Command::DelegateTyped),

            "verify_typed" | "verify" => {
                let signature = arg(0).ok_or_else(|| {
                    anyhow::anyhow!("Missing signature. Usage: verify_typed <signature>")
                })?;
                Ok(Command::VerifyTyped {
                    signature: signature.to_string(),
                })
            }

            "receipt" | "tx" => {
                let hash_str = arg(0).ok_or_else(|| {
                    anyhow::anyhow!("Missing transaction hash. Usage: receipt <tx_hash>")
                })?;
                let hash = hash_str
                    .parse::<TxHash>()
                    .with_context(|| format!("Invalid transaction hash '{hash_str}'"))?;
                Ok(Command::Receipt { hash })
            }

            "help" | "h" | "?" => Ok(Command::Help {
                command: arg(0).map(|s| s.to_string()),
            }),

            "exit" | "quit" | "q" => Ok(Command::Exit),

            other => bail!("Unknown command: '{other}'. Type 'help' for a list of commands."),
        }
    }
}

fn parse_address(input: &str, what: &str) -> Result<Address> {
    input
        .parse::<Address>()
        .with_context(|| format!("Invalid {what} address '{input}'"))
}

fn optional_address(input: Option<&str>, what: &str) -> Result<Option<Address>> {
    input.map(|s| parse_address(s, what)).transpose()
}

/// Shape check only; the contract's decimals are needed to convert.
fn validate_amount(input: &str) -> Result<String> {
    let valid = !input.is_empty()
        && input.chars().all(|c| c.is_ascii_digit() || c == '.')
        && input.matches('.').count() <= 1
        && input.chars().any(|c| c.is_ascii_digit());
    if !valid {
        bail!("Invalid amount '{input}'");
    }
    if input.chars().all(|c| c == '0' || c == '.') {
        bail!("Amount must be greater than 0.");
    }
    Ok(input.to_string())
}
