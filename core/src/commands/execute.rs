use anyhow::{bail, Result};
use serde_json::json;

use super::help::help_text;
use super::Command;
use crate::display;
use crate::service::StakingService;

impl Command {
    /// Execute a command and return the output string.
    ///
    /// Writes return once the transaction is submitted; the receipt lands in the result
    /// slot when the background poll finds it.
    pub async fn execute(&self, service: &mut StakingService, json_output: bool) -> Result<String> {
        if let Some(action) = self.read_action() {
            let value = service.read(action).await?;
            return Ok(if json_output {
                value.to_json()
            } else {
                value.to_string()
            });
        }

        if let Some(action) = self.write_action() {
            let method = action.method();
            let outcome = service.write(action).await?;
            return Ok(if json_output {
                json!({
                    "method": method,
                    "tx_hash": outcome.hash.to_string(),
                    "receipt_query": outcome.command,
                })
                .to_string()
            } else {
                format!(
                    "Transaction sent!\n  Method:  {method}\n  Hash:    {}\n  Polling for the receipt in the background.\n  Manual lookup:\n    {}",
                    outcome.hash, outcome.command,
                )
            });
        }

        match self {
            Command::Connect => {
                if !service.connect().await {
                    bail!("Wallet connection failed. See the log for details.");
                }
                let session = service.session();
                let node_url = &service.config().node_url;
                if json_output {
                    Ok(display::format_status_json(session, service.is_busy(), node_url))
                } else {
                    Ok(format!(
                        "Connected.\n{}",
                        display::format_status(session, service.is_busy(), node_url)
                    ))
                }
            }

            Command::Status => {
                let session = service.session();
                let node_url = &service.config().node_url;
                if json_output {
                    Ok(display::format_status_json(session, service.is_busy(), node_url))
                } else {
                    Ok(display::format_status(session, service.is_busy(), node_url))
                }
            }

            Command::Result => {
                let current = service.result();
                if json_output {
                    Ok(serde_json::to_string(&current)?)
                } else {
                    Ok(display::format_result(&current))
                }
            }

            Command::DelegateTyped => {
                let signed = service.delegate_typed().await?;
                if json_output {
                    Ok(serde_json::to_string(&signed)?)
                } else {
                    Ok(format!("Signature: {}\n{}", signed.signature, signed.parts))
                }
            }

            Command::VerifyTyped { signature } => {
                let check = service.verify_typed(signature)?;
                if json_output {
                    Ok(json!({
                        "valid": check.valid,
                        "recovered": check.recovered.to_string(),
                        "expected": check.expected.to_string(),
                    })
                    .to_string())
                } else if check.valid {
                    Ok(format!("Signature is valid.\n  Signer: {}", check.recovered))
                } else {
                    Ok(format!(
                        "Signature does not match the connected account.\n  Recovered: {}\n  Expected:  {}",
                        check.recovered, check.expected,
                    ))
                }
            }

            Command::Receipt { hash } => {
                // Detached: the poll publishes to the result slot on its own.
                drop(service.poll_receipt(*hash));
                if json_output {
                    Ok(json!({ "tx_hash": hash.to_string(), "polling": true }).to_string())
                } else {
                    Ok(format!("Polling for the receipt of {hash}..."))
                }
            }

            Command::Help { command } => Ok(help_text(command.as_deref())),

            Command::Exit => Ok(String::new()),

            // Contract calls were dispatched above.
            _ => bail!("Command cannot be executed here."),
        }
    }
}
