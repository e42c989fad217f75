/// Shared UI-facing state: the busy flag and the single result slot.
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

/// Set while a contract call or receipt poll is in flight. Last write wins.
#[derive(Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, busy: bool) {
        self.0.store(busy, Ordering::SeqCst);
    }

    /// Raise the flag until the returned guard drops.
    #[must_use = "the flag is cleared as soon as the guard drops"]
    pub fn engage(&self) -> BusyGuard {
        self.set(true);
        BusyGuard(self.clone())
    }
}

impl fmt::Debug for BusyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BusyFlag").field(&self.is_busy()).finish()
    }
}

/// Clears the busy flag on drop, whichever way the holder exits.
pub struct BusyGuard(BusyFlag);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Which flow wrote the current result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Producer {
    None,
    Invoker,
    Signer,
    Poller,
}

impl fmt::Display for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Invoker => write!(f, "invoker"),
            Self::Signer => write!(f, "signer"),
            Self::Poller => write!(f, "poller"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultMessage {
    pub producer: Producer,
    pub text: String,
    /// Number of writes so far, used to spot overwrites.
    pub seq: u64,
}

/// Single-slot result channel. Every write replaces the previous text; overwrites by a
/// different producer are logged so concurrent flows stay visible.
#[derive(Clone)]
pub struct ResultSlot {
    tx: Arc<watch::Sender<ResultMessage>>,
}

impl Default for ResultSlot {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(ResultMessage {
            producer: Producer::None,
            text: String::new(),
            seq: 0,
        });
        Self { tx: Arc::new(tx) }
    }
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, producer: Producer, text: impl Into<String>) {
        let text = text.into();
        self.tx.send_modify(|current| {
            if current.producer != producer && current.producer != Producer::None {
                debug!(
                    previous = %current.producer,
                    next = %producer,
                    seq = current.seq,
                    "result overwritten by another flow"
                );
            }
            current.producer = producer;
            current.text = text;
            current.seq += 1;
        });
    }

    pub fn current(&self) -> ResultMessage {
        self.tx.borrow().clone()
    }

    pub fn text(&self) -> String {
        self.tx.borrow().text.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResultMessage> {
        self.tx.subscribe()
    }
}
