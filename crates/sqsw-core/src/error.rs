use thiserror::Error;

/// Failures surfaced by [`BatchingQueueWriter`](crate::BatchingQueueWriter).
///
/// Nothing is retried. A failed submission loses the batch it carried.
#[derive(Debug, Error)]
pub enum WriterError {
    /// Bad constructor arguments.
    #[error("invalid writer arguments: {0}")]
    Validation(String),

    /// The queue name could not be resolved to an address.
    ///
    /// The writer stays usable; the next write resolves again.
    #[error("failed to resolve the address of queue '{name}'")]
    Resolution {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A batch request was rejected or never reached the queue.
    #[error("failed to submit batch to '{address}'")]
    Submission {
        address: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to serialize message payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The writer was closed and accepts no further operations.
    #[error("writer is closed")]
    Closed,
}

impl WriterError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
