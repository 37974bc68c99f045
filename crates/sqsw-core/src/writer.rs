//! Buffers outbound messages and submits them to a queue in batches.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::QueueClient;
use crate::config::{FullBufferPolicy, WriterOptions};
use crate::error::WriterError;
use crate::message::{Entry, OutboundMessage};
use crate::observer::{LogObserver, WriterObserver};
use crate::queue::QueueIdentifier;

/// A writable sink: one item per `write`, a final `close`.
///
/// Callers drive a sink from a single task; every method takes `&mut self`.
#[async_trait]
pub trait MessageSink: Send {
    async fn write(&mut self, message: OutboundMessage) -> Result<(), WriterError>;

    /// Flushes whatever is pending. No writes are accepted afterwards.
    async fn close(&mut self) -> Result<(), WriterError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriterState {
    Idle,
    Closed,
}

/// Accumulates messages and flushes them to the queue `batch_size` at a time.
///
/// # Example
///
/// ```
/// use sqsw::{BatchingQueueWriter, MemoryQueue, QueueIdentifier, WriterOptions};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), sqsw::WriterError> {
/// let queue = MemoryQueue::new().with_queue("orders");
/// let mut writer = BatchingQueueWriter::new(
///     QueueIdentifier::name("orders"),
///     WriterOptions::default().with_batch_size(2),
///     queue.clone(),
/// )?;
///
/// writer.write(json!({"sku": "A-1"}).into()).await?;
/// writer.close().await?;
/// assert_eq!(queue.batches().len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct BatchingQueueWriter<C> {
    client: C,
    queue_name: Option<String>,
    queue_url: Option<String>,
    options: WriterOptions,
    buffer: Vec<Entry>,
    observer: Arc<dyn WriterObserver>,
    state: WriterState,
}

impl<C: QueueClient> BatchingQueueWriter<C> {
    /// Creates a writer that reports its lifecycle through [`LogObserver`].
    pub fn new(
        queue: QueueIdentifier,
        options: WriterOptions,
        client: C,
    ) -> Result<Self, WriterError> {
        Self::with_observer(queue, options, client, Arc::new(LogObserver))
    }

    pub fn with_observer(
        queue: QueueIdentifier,
        options: WriterOptions,
        client: C,
        observer: Arc<dyn WriterObserver>,
    ) -> Result<Self, WriterError> {
        queue.validate()?;
        options.validate()?;

        observer.stream_constructed(&queue, &options);

        Ok(Self {
            client,
            queue_name: queue.name,
            queue_url: queue.url,
            buffer: Vec::with_capacity(options.batch_size),
            options,
            observer,
            state: WriterState::Idle,
        })
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// The queue address, if known yet.
    pub fn queue_url(&self) -> Option<&str> {
        self.queue_url.as_deref()
    }

    /// Number of messages waiting for the next flush.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Looks the queue address up by name and caches it for the writer's lifetime.
    ///
    /// Nothing is cached when the lookup fails.
    pub async fn resolve_address(&mut self) -> Result<&str, WriterError> {
        let url = match self.queue_url.take() {
            Some(url) => url,
            None => {
                let name = self.queue_name.as_deref().ok_or_else(|| {
                    WriterError::validation("queue has neither a url nor a name to resolve")
                })?;

                let url = self
                    .client
                    .resolve_address(name)
                    .await
                    .map_err(|source| WriterError::Resolution {
                        name: name.to_string(),
                        source,
                    })?;

                log::debug!("resolved queue '{}' to {}", name, url);
                url
            }
        };

        Ok(self.queue_url.insert(url).as_str())
    }

    pub async fn write(&mut self, message: OutboundMessage) -> Result<(), WriterError> {
        if self.state == WriterState::Closed {
            return Err(WriterError::Closed);
        }

        self.observer.message_received(&message);

        match self.process(&message).await {
            Ok(()) => {
                self.observer.message_processed(&message);
                Ok(())
            }
            Err(err) => {
                self.observer.message_processing_error(&message, &err);
                Err(err)
            }
        }
    }

    /// Submits any buffered messages as one final batch and closes the writer.
    ///
    /// The writer is closed afterwards even when the final submission fails.
    pub async fn close(&mut self) -> Result<(), WriterError> {
        if self.state == WriterState::Closed {
            return Err(WriterError::Closed);
        }
        self.state = WriterState::Closed;

        if self.buffer.is_empty() {
            return Ok(());
        }

        let result = self.flush().await;
        if let Err(err) = &result {
            self.observer.stream_finishing_error(err);
        }
        result
    }

    async fn process(&mut self, message: &OutboundMessage) -> Result<(), WriterError> {
        self.resolve_address().await?;

        match self.options.full_buffer {
            FullBufferPolicy::DropTrigger => {
                if self.buffer.len() >= self.options.batch_size {
                    self.flush().await?;
                    log::warn!("buffer was full; message dropped after flush: {:?}", message);
                    return Ok(());
                }
                let entry = self.normalize(message)?;
                self.buffer.push(entry);
            }
            FullBufferPolicy::AppendThenFlush => {
                let entry = self.normalize(message)?;
                self.buffer.push(entry);
                if self.buffer.len() >= self.options.batch_size {
                    self.flush().await?;
                }
            }
        }

        Ok(())
    }

    fn normalize(&self, message: &OutboundMessage) -> Result<Entry, WriterError> {
        match message {
            OutboundMessage::Entry(entry) => Ok(entry.clone()),
            OutboundMessage::Payload(value) => {
                let body = serde_json::to_string(value)?;
                let entry = Entry::new(uuid::Uuid::new_v4().to_string(), body);
                Ok(match &self.options.group_id {
                    Some(group_id) => entry.with_group_id(group_id.as_str()),
                    None => entry,
                })
            }
        }
    }

    /// Takes the buffer and submits it. The taken entries are gone whether
    /// or not the submission succeeds.
    async fn flush(&mut self) -> Result<(), WriterError> {
        let address = self.resolve_address().await?.to_string();
        let entries = std::mem::take(&mut self.buffer);

        let ack = self
            .client
            .submit_batch(&entries, &address)
            .await
            .map_err(|source| WriterError::Submission {
                address: address.clone(),
                source,
            })?;

        log::debug!(
            "submitted {} messages to {} ({} accepted)",
            entries.len(),
            address,
            ack.successful.len()
        );
        for failed in &ack.failed {
            log::warn!(
                "queue rejected message {}: {} - {}",
                failed.id,
                failed.code,
                failed.message.as_deref().unwrap_or("unknown")
            );
        }

        Ok(())
    }
}

#[async_trait]
impl<C: QueueClient> MessageSink for BatchingQueueWriter<C> {
    async fn write(&mut self, message: OutboundMessage) -> Result<(), WriterError> {
        BatchingQueueWriter::write(self, message).await
    }

    async fn close(&mut self) -> Result<(), WriterError> {
        BatchingQueueWriter::close(self).await
    }
}
