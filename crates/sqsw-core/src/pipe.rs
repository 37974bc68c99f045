//! Drives a [`MessageSink`] from a channel of messages.

use tokio::sync::mpsc::Receiver;

use crate::error::WriterError;
use crate::message::OutboundMessage;
use crate::writer::MessageSink;

/// What to do after a write fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OnError {
    /// Count the failure and keep writing.
    #[default]
    Continue,
    /// Stop reading; the sink is still closed.
    Abort,
}

/// Outcome of a [`pipe`] run.
#[derive(Debug)]
pub struct PipeSummary {
    pub written: usize,
    pub failed: usize,
    /// The first write failure when aborting in [`OnError::Abort`] mode.
    pub aborted: Option<WriterError>,
    pub closed: Result<(), WriterError>,
}

impl PipeSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.closed.is_ok()
    }
}

/// Writes every message received on `rx` to `sink` in arrival order, then
/// closes the sink.
///
/// Each write completes before the next message is read, so a slow sink
/// backs up the channel.
pub async fn pipe<S: MessageSink>(
    mut rx: Receiver<OutboundMessage>,
    sink: &mut S,
    on_error: OnError,
) -> PipeSummary {
    let mut written = 0;
    let mut failed = 0;
    let mut aborted = None;

    while let Some(message) = rx.recv().await {
        match sink.write(message).await {
            Ok(()) => written += 1,
            Err(err) => {
                failed += 1;
                if on_error == OnError::Abort {
                    aborted = Some(err);
                    rx.close();
                    break;
                }
            }
        }
    }

    let closed = sink.close().await;

    PipeSummary {
        written,
        failed,
        aborted,
        closed,
    }
}
