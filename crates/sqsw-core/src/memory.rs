//! In-memory [`QueueClient`] for development, dry runs and tests.
//!
//! Every submitted batch is recorded in order. Failures can be injected one
//! call at a time to exercise error paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::client::{BatchAck, QueueClient};
use crate::message::Entry;

/// A batch as it reached the queue.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SubmittedBatch {
    pub address: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Default)]
struct State {
    directory: HashMap<String, String>,
    batches: Vec<SubmittedBatch>,
    resolve_calls: usize,
    submit_calls: usize,
    failing_resolves: usize,
    failing_submits: usize,
}

/// Handle to a set of in-memory queues. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct MemoryQueue {
    state: Arc<Mutex<State>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a queue so that its name resolves.
    pub fn with_queue(self, name: &str) -> Self {
        let url = Self::url_for(name);
        self.lock().directory.insert(name.to_string(), url);
        self
    }

    /// The address a registered queue resolves to.
    pub fn url_for(name: &str) -> String {
        format!("memory://queues/{}", name)
    }

    /// Makes the next resolution fail.
    pub fn fail_next_resolve(&self) {
        self.lock().failing_resolves += 1;
    }

    /// Makes the next batch submission fail.
    pub fn fail_next_submit(&self) {
        self.lock().failing_submits += 1;
    }

    /// Successfully submitted batches, oldest first.
    pub fn batches(&self) -> Vec<SubmittedBatch> {
        self.lock().batches.clone()
    }

    /// All entries from successful batches, in submission order.
    pub fn entries(&self) -> Vec<Entry> {
        self.lock()
            .batches
            .iter()
            .flat_map(|b| b.entries.iter().cloned())
            .collect()
    }

    /// Resolution attempts, including failed ones.
    pub fn resolve_calls(&self) -> usize {
        self.lock().resolve_calls
    }

    /// Submission attempts, including failed ones.
    pub fn submit_calls(&self) -> usize {
        self.lock().submit_calls
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl QueueClient for MemoryQueue {
    async fn resolve_address(&self, name: &str) -> anyhow::Result<String> {
        let mut state = self.lock();
        state.resolve_calls += 1;

        if state.failing_resolves > 0 {
            state.failing_resolves -= 1;
            anyhow::bail!("injected resolution failure for '{}'", name);
        }

        state
            .directory
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("queue '{}' does not exist", name))
    }

    async fn submit_batch(&self, entries: &[Entry], address: &str) -> anyhow::Result<BatchAck> {
        let mut state = self.lock();
        state.submit_calls += 1;

        if state.failing_submits > 0 {
            state.failing_submits -= 1;
            anyhow::bail!("injected submission failure for '{}'", address);
        }

        state.batches.push(SubmittedBatch {
            address: address.to_string(),
            entries: entries.to_vec(),
        });

        Ok(BatchAck::all(entries))
    }
}
