mod repl;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cpc_staking_core::commands::Command;
use cpc_staking_core::config::DappConfig;
use cpc_staking_core::service::StakingService;
use cpc_staking_core::Producer;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "cpc_staking=info,cpc_staking_core=info";

#[derive(Parser)]
#[command(
    name = "cpc-staking",
    about = "Staking precompile client: connect a wallet, call the contract, poll receipts",
    version
)]
pub(crate) struct Cli {
    /// Config file (default: <data dir>/cpc-staking/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Node JSON-RPC URL used for receipts
    #[arg(long, env = "CPC_NODE_URL")]
    node: Option<String>,

    /// Wallet JSON-RPC URL holding the unlocked accounts (default: the node URL)
    #[arg(long, env = "CPC_WALLET_URL")]
    wallet_rpc: Option<String>,

    /// Staking contract address
    #[arg(long)]
    staking_address: Option<String>,

    /// Delay between receipt polls, in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Give up on a receipt after this many milliseconds
    #[arg(long)]
    poll_timeout_ms: Option<u64>,

    /// Allow the redelegate command
    #[arg(long)]
    enable_redelegate: bool,

    /// Run a single command and exit
    #[arg(long)]
    cmd: Option<String>,

    /// Output in JSON format (useful with --cmd)
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => cpc_staking_core::default_config_path(),
        }
    }

    /// Stored config with CLI flags applied on top.
    fn resolve_config(&self) -> Result<DappConfig> {
        let path = self.config_path()?;
        let mut config = if self.config.is_some() {
            DappConfig::load(&path)?
        } else {
            DappConfig::load_or_default(&path)?
        };

        if let Some(url) = &self.node {
            config.node_url = url.clone();
        }
        if let Some(url) = &self.wallet_rpc {
            config.wallet_url = Some(url.clone());
        }
        if let Some(addr) = &self.staking_address {
            config.staking_address = addr.clone();
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
        if let Some(ms) = self.poll_timeout_ms {
            config.poll_timeout_ms = ms;
        }
        if self.enable_redelegate {
            config.enable_redelegate = true;
        }

        config
            .validate()
            .with_context(|| format!("Invalid configuration (loaded from {})", path.display()))?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.resolve_config()?;
    tracing::debug!(
        node = %config.node_url,
        wallet = %config.wallet_url(),
        contract = %config.staking_address,
        "configuration resolved"
    );
    let service = StakingService::from_config(config)?;

    if let Some(cmd_str) = &cli.cmd {
        // One-shot mode
        run_oneshot(&cli, service, cmd_str).await
    } else {
        // REPL mode
        repl::run_repl(&cli, service).await
    }
}

async fn run_oneshot(cli: &Cli, mut service: StakingService, cmd_str: &str) -> Result<()> {
    let command = Command::parse(cmd_str)?;
    if command == Command::Exit {
        return Ok(());
    }

    if !matches!(command, Command::Connect | Command::Help { .. }) && !service.connect().await {
        bail!(
            "Wallet connection failed. Check that {} exposes unlocked accounts.",
            service.config().wallet_url()
        );
    }

    let mut results = service.subscribe();

    let output = command.execute(&mut service, cli.json).await?;
    if !output.is_empty() {
        println!("{output}");
    }

    if command.starts_poll() {
        let poll = service.config().poll();
        let wait = poll.timeout + poll.interval;
        let mined = tokio::time::timeout(wait, async {
            while results.changed().await.is_ok() {
                let current = results.borrow_and_update().clone();
                if current.producer == Producer::Poller {
                    return Some(current.text);
                }
            }
            None
        })
        .await
        .ok()
        .flatten();

        match mined {
            Some(receipt) => println!("{receipt}"),
            None => eprintln!(
                "No receipt within {}s. Check later with: receipt <tx_hash>",
                poll.timeout.as_secs()
            ),
        }
    }

    Ok(())
}

/// Receipt poll cadence, for the REPL banner.
pub(crate) fn describe_poll(config: &DappConfig) -> String {
    let poll = config.poll();
    format!(
        "every {} for up to {}",
        humanize(poll.interval),
        humanize(poll.timeout)
    )
}

fn humanize(d: Duration) -> String {
    if d.subsec_millis() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{}ms", d.as_millis())
    }
}
