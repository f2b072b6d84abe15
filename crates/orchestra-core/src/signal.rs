//! Single-fire completion signals for dependency scheduling.
//!
//! A signal is created for every task before any task starts, so a dependent
//! can subscribe before its dependency has even been spawned. Waiting on a
//! signal that already fired returns immediately.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;

use crate::definition::TaskDefinition;
use crate::error::{OrchestraError, Result};

/// One-shot, idempotently awaitable completion flag.
#[derive(Debug, Clone)]
pub struct CompletionSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal. Firing twice is a no-op.
    pub fn fire(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the signal has fired.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|fired| *fired).await;
    }

    /// Guard that fires the signal when dropped, whatever path the task takes.
    pub fn fire_on_drop(&self) -> SignalGuard {
        SignalGuard {
            signal: self.clone(),
        }
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Fires its signal on drop.
#[derive(Debug)]
pub struct SignalGuard {
    signal: CompletionSignal,
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.signal.fire();
    }
}

/// Completion signals keyed by agent id.
#[derive(Debug, Clone, Default)]
pub struct SignalBoard {
    signals: HashMap<String, CompletionSignal>,
}

impl SignalBoard {
    /// Create one signal per task, up front.
    pub fn for_tasks(tasks: &[TaskDefinition]) -> Self {
        let signals = tasks
            .iter()
            .map(|t| (t.agent_id.clone(), CompletionSignal::new()))
            .collect();
        Self { signals }
    }

    pub fn get(&self, agent_id: &str) -> Option<&CompletionSignal> {
        self.signals.get(agent_id)
    }

    /// Wait for every listed agent to signal completion.
    pub async fn wait_all(&self, agent_ids: &[String]) -> Result<()> {
        let mut waits = Vec::with_capacity(agent_ids.len());
        for id in agent_ids {
            let signal = self.signals.get(id).ok_or_else(|| {
                OrchestraError::Orchestration(format!("no completion signal for agent '{}'", id))
            })?;
            waits.push(signal.wait());
        }
        join_all(waits).await;
        Ok(())
    }
}
