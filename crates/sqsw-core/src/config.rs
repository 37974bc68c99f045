//! Writer and queue client configuration.

use crate::error::WriterError;

/// Default number of messages per submit call.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// SQS rejects batch requests carrying more entries than this.
pub const SQS_MAX_BATCH_ENTRIES: usize = 10;

/// What happens to the message that finds the buffer already full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullBufferPolicy {
    /// Flush the full buffer and discard the message that triggered the flush.
    ///
    /// This is the long-standing behavior of the writer and most likely a
    /// defect: the triggering message never reaches the queue.
    #[default]
    DropTrigger,
    /// Append every message and flush as soon as the buffer reaches the batch size.
    AppendThenFlush,
}

/// Settings handed through to the queue client untouched by the writer.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// AWS region; falls back to the default provider chain, then `us-east-1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Endpoint override, e.g. a LocalStack instance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Use static `test` credentials for LocalStack.
    pub local: bool,
}

/// Options controlling how a [`BatchingQueueWriter`](crate::BatchingQueueWriter) batches.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterOptions {
    /// Messages per submit call.
    pub batch_size: usize,
    /// Ordering-group tag attached to every generated entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub client_config: ClientConfig,
    pub full_buffer: FullBufferPolicy,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            group_id: None,
            client_config: ClientConfig::default(),
            full_buffer: FullBufferPolicy::default(),
        }
    }
}

impl WriterOptions {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_full_buffer(mut self, policy: FullBufferPolicy) -> Self {
        self.full_buffer = policy;
        self
    }

    /// Parses options from JSON, applying defaults for missing fields.
    ///
    /// Only a JSON object is accepted, and unknown keys are rejected.
    pub fn from_json(json: &str) -> Result<Self, WriterError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| WriterError::validation(e.to_string()))?;
        if !value.is_object() {
            return Err(WriterError::validation("writer options must be a JSON object"));
        }
        serde_json::from_value(value).map_err(|e| WriterError::validation(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), WriterError> {
        if self.batch_size == 0 {
            return Err(WriterError::validation("batch size must be at least 1"));
        }
        if matches!(self.group_id.as_deref(), Some("")) {
            return Err(WriterError::validation("group id cannot be empty"));
        }
        if self.batch_size > SQS_MAX_BATCH_ENTRIES {
            log::warn!(
                "batch size {} exceeds the SQS limit of {} entries per request",
                self.batch_size,
                SQS_MAX_BATCH_ENTRIES
            );
        }
        Ok(())
    }
}
