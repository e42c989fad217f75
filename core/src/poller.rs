/// Receipt poller: repoll the node for a transaction receipt until it is mined or the
/// timeout flag fires.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::TxHash;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::PollConfig;
use crate::error::Result;
use crate::rpc::{self, NodeClient, TransactionReceipt};
use crate::state::{BusyFlag, BusyGuard, Producer, ResultSlot};

/// How a poll ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Mined {
        receipt: TransactionReceipt,
        attempts: u32,
    },
    /// Timed out without a mined receipt; the result slot was left alone.
    TimedOut { attempts: u32 },
}

#[derive(Clone)]
pub struct ReceiptPoller {
    node: Arc<dyn NodeClient>,
    busy: BusyFlag,
    results: ResultSlot,
    config: PollConfig,
}

impl ReceiptPoller {
    pub fn new(
        node: Arc<dyn NodeClient>,
        busy: BusyFlag,
        results: ResultSlot,
        config: PollConfig,
    ) -> Self {
        Self {
            node,
            busy,
            results,
            config,
        }
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Start polling in the background. The busy flag is raised before this returns,
    /// without looking at its current value. A failed poll is logged here, since callers
    /// may drop the handle.
    pub fn spawn(&self, hash: TxHash) -> JoinHandle<Result<PollOutcome>> {
        let busy = self.busy.engage();
        let poller = self.clone();
        tokio::spawn(async move {
            let outcome = poller.run(hash, busy).await;
            if let Err(e) = &outcome {
                warn!(tx = %hash, error = %e, "receipt poll failed");
            }
            outcome
        })
    }

    /// Poll in the current task.
    pub async fn poll(&self, hash: TxHash) -> Result<PollOutcome> {
        let busy = self.busy.engage();
        self.run(hash, busy).await
    }

    async fn run(&self, hash: TxHash, _busy: BusyGuard) -> Result<PollOutcome> {
        let timed_out = Arc::new(AtomicBool::new(false));
        let timer = {
            let flag = timed_out.clone();
            let timeout = self.config.timeout;
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                flag.store(true, Ordering::SeqCst);
            })
        };

        let outcome = self.repoll(hash, &timed_out).await;
        timer.abort();
        outcome
    }

    async fn repoll(&self, hash: TxHash, timed_out: &AtomicBool) -> Result<PollOutcome> {
        let mut attempts = 0u32;
        while !timed_out.load(Ordering::SeqCst) {
            attempts += 1;
            match self.node.transaction_receipt(hash).await? {
                Some(receipt) if rpc::is_mined(&receipt) => {
                    info!(tx = %hash, block = ?receipt.block_number, attempts, "receipt mined");
                    self.results
                        .publish(Producer::Poller, rpc::pretty_receipt(&receipt));
                    return Ok(PollOutcome::Mined { receipt, attempts });
                }
                Some(_) => debug!(tx = %hash, attempts, "receipt pending"),
                None => debug!(tx = %hash, attempts, "receipt not found"),
            }
            tokio::time::sleep(self.config.interval).await;
        }
        debug!(tx = %hash, attempts, "receipt poll timed out");
        Ok(PollOutcome::TimedOut { attempts })
    }
}
