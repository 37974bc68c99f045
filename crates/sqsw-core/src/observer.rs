//! Lifecycle hooks for watching a writer.

use crate::config::WriterOptions;
use crate::error::WriterError;
use crate::message::OutboundMessage;
use crate::queue::QueueIdentifier;

/// Receives writer lifecycle events. Every method defaults to doing nothing.
///
/// Hooks are fire-and-forget; they run inline on the writer's task and
/// should not block.
pub trait WriterObserver: Send + Sync {
    fn stream_constructed(&self, _queue: &QueueIdentifier, _options: &WriterOptions) {}

    fn message_received(&self, _message: &OutboundMessage) {}

    fn message_processed(&self, _message: &OutboundMessage) {}

    fn message_processing_error(&self, _message: &OutboundMessage, _error: &WriterError) {}

    fn stream_finishing_error(&self, _error: &WriterError) {}
}

/// Ignores every event.
impl WriterObserver for () {}

/// Reports events through the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl WriterObserver for LogObserver {
    fn stream_constructed(&self, queue: &QueueIdentifier, options: &WriterOptions) {
        log::info!(
            "writing to {} in batches of {}",
            queue,
            options.batch_size
        );
    }

    fn message_received(&self, message: &OutboundMessage) {
        log::debug!("received {:?}", message);
    }

    fn message_processed(&self, message: &OutboundMessage) {
        log::debug!("processed {:?}", message);
    }

    fn message_processing_error(&self, message: &OutboundMessage, error: &WriterError) {
        log::error!("failed to process {:?}: {}", message, error_chain(error));
    }

    fn stream_finishing_error(&self, error: &WriterError) {
        log::error!("failed to flush on close: {}", error_chain(error));
    }
}

// renders the error with its sources, e.g. "outer: inner"
fn error_chain(error: &WriterError) -> String {
    let mut out = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(err) = source {
        out.push_str(": ");
        out.push_str(&err.to_string());
        source = err.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_includes_sources() {
        let error = WriterError::Submission {
            address: "memory://queues/orders".to_string(),
            source: anyhow::anyhow!("connection reset"),
        };
        assert_eq!(
            error_chain(&error),
            "failed to submit batch to 'memory://queues/orders': connection reset"
        );
    }
}
