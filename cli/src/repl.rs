/// REPL shell: Reedline-based interactive staking session.
use anyhow::Result;
use cpc_staking_core::commands::Command;
use cpc_staking_core::service::StakingService;
use cpc_staking_core::Producer;
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use tokio::task::JoinHandle;

use crate::Cli;

pub async fn run_repl(cli: &Cli, mut service: StakingService) -> Result<()> {
    println!("cpc-staking v{}", env!("CARGO_PKG_VERSION"));
    println!("Contract: {}", service.staking_address());
    println!("Node:     {}", service.config().node_url);
    println!("Receipts: polled {}", crate::describe_poll(service.config()));
    println!();

    println!("Connecting to wallet at {}...", service.config().wallet_url());
    if service.connect().await {
        let session = service.session();
        println!(
            "Wallet connected. Account: {} (chain {})",
            session.account,
            session.chain_id.unwrap_or_default()
        );
    } else {
        println!("Wallet not connected. Run 'connect' to retry.");
    }
    println!("Type 'help' for a list of commands.");
    println!();

    let receipts = print_receipts(&service);

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("[cpc-staking]".to_string()),
        DefaultPromptSegment::Empty,
    );

    let commands: Vec<String> = vec![
        "connect".into(),
        "status".into(),
        "result".into(),
        "res".into(),
        "name".into(),
        "symbol".into(),
        "decimals".into(),
        "delegated_validators".into(),
        "validators".into(),
        "delegation_of".into(),
        "delegation".into(),
        "total_delegation_of".into(),
        "total_delegation".into(),
        "reward_of".into(),
        "reward".into(),
        "rewards_of".into(),
        "rewards".into(),
        "balance_of".into(),
        "balance".into(),
        "bal".into(),
        "delegate".into(),
        "undelegate".into(),
        "redelegate".into(),
        "withdraw_reward".into(),
        "withdraw_rewards".into(),
        "withdraw".into(),
        "delegate_by_message".into(),
        "delegate_signed".into(),
        "delegate_typed".into(),
        "sign_typed".into(),
        "verify_typed".into(),
        "verify".into(),
        "receipt".into(),
        "tx".into(),
        "help".into(),
        "exit".into(),
        "quit".into(),
        "q".into(),
    ];
    let completer = Box::new(DefaultCompleter::new(commands));
    let mut line_editor = Reedline::create().with_completer(completer);

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match Command::parse(line) {
                    Ok(Command::Exit) => {
                        println!("Goodbye.");
                        break;
                    }
                    Ok(cmd) => {
                        if let Some(prompt_msg) = cmd.confirmation_prompt() {
                            if !prompt_confirm(&prompt_msg) {
                                println!("Cancelled.");
                                continue;
                            }
                        }
                        match cmd.execute(&mut service, cli.json).await {
                            Ok(output) => {
                                if !output.is_empty() {
                                    println!("{output}");
                                }
                            }
                            Err(e) => {
                                eprintln!("Error: {e}");
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("{e}");
                    }
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                println!("Goodbye.");
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }
    }

    receipts.abort();
    Ok(())
}

/// Print receipts as background polls publish them.
fn print_receipts(service: &StakingService) -> JoinHandle<()> {
    let mut results = service.subscribe();
    tokio::spawn(async move {
        while results.changed().await.is_ok() {
            let current = results.borrow_and_update().clone();
            if current.producer == Producer::Poller {
                println!("\nReceipt mined:\n{}", current.text);
            }
        }
    })
}

fn prompt_confirm(prompt: &str) -> bool {
    use std::io::Write;
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).is_ok() && input.trim().eq_ignore_ascii_case("y")
}
