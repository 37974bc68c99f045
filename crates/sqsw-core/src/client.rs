//! The seam between the writer and the queue service.

use async_trait::async_trait;

use crate::message::Entry;

/// An entry the queue service refused.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FailedEntry {
    pub id: String,
    pub code: String,
    pub message: Option<String>,
    /// Whether the service blamed the request rather than itself.
    pub sender_fault: bool,
}

/// Per-entry outcome of one batch request.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchAck {
    /// Ids of accepted entries.
    pub successful: Vec<String>,
    pub failed: Vec<FailedEntry>,
}

impl BatchAck {
    /// Every entry accepted.
    pub fn all(entries: &[Entry]) -> Self {
        Self {
            successful: entries.iter().map(|e| e.id.clone()).collect(),
            failed: Vec::new(),
        }
    }
}

/// Performs the network calls a writer needs.
///
/// Implementations own authentication, timeouts and transport configuration.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Looks up the address of the queue called `name`.
    async fn resolve_address(&self, name: &str) -> anyhow::Result<String>;

    /// Submits `entries` to the queue at `address` in a single request.
    async fn submit_batch(&self, entries: &[Entry], address: &str) -> anyhow::Result<BatchAck>;
}

#[async_trait]
impl<C: QueueClient + ?Sized> QueueClient for std::sync::Arc<C> {
    async fn resolve_address(&self, name: &str) -> anyhow::Result<String> {
        (**self).resolve_address(name).await
    }

    async fn submit_batch(&self, entries: &[Entry], address: &str) -> anyhow::Result<BatchAck> {
        (**self).submit_batch(entries, address).await
    }
}
