//! # sqsw-core
//!
//! Buffers outbound messages and writes them to AWS SQS in batches.
//!
//! A [`BatchingQueueWriter`] accepts one message per [`write`](BatchingQueueWriter::write),
//! keeps up to `batch_size` of them in memory and submits them with a single
//! `SendMessageBatch` call. [`close`](BatchingQueueWriter::close) flushes what is left.
//!
//! ## Features
//!
//! - **Lazy Resolution**: Queues given by name are resolved to a URL on first write
//! - **Pass-through Entries**: Messages already shaped as `{Id, MessageBody}` are sent untouched
//! - **FIFO Groups**: An optional `MessageGroupId` is attached to every generated entry
//! - **Pluggable Clients**: [`SqsClient`] for AWS, [`MemoryQueue`] for dry runs and tests
//!
//! ## Example
//!
//! ```no_run
//! use sqsw::{BatchingQueueWriter, ClientConfig, QueueIdentifier, SqsClient, WriterOptions};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), sqsw::WriterError> {
//! let client = SqsClient::load(&ClientConfig::default()).await;
//! let mut writer = BatchingQueueWriter::new(
//!     QueueIdentifier::name("orders"),
//!     WriterOptions::default(),
//!     client,
//! )?;
//!
//! writer.write(json!({"sku": "A-1", "qty": 2}).into()).await?;
//! writer.close().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod memory;
mod message;
mod observer;
mod pipe;
mod queue;
mod sqs;
mod writer;

#[cfg(test)]
mod test_utils;

pub use client::{BatchAck, FailedEntry, QueueClient};
pub use config::{
    ClientConfig, FullBufferPolicy, WriterOptions, DEFAULT_BATCH_SIZE, SQS_MAX_BATCH_ENTRIES,
};
pub use error::WriterError;
pub use memory::{MemoryQueue, SubmittedBatch};
pub use message::{Entry, OutboundMessage};
pub use observer::{LogObserver, WriterObserver};
pub use pipe::{pipe, OnError, PipeSummary};
pub use queue::QueueIdentifier;
pub use sqs::SqsClient;
pub use writer::{BatchingQueueWriter, MessageSink, WriterState};
