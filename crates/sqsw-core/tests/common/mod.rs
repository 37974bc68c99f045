use serde_json::json;
use sqsw::{BatchingQueueWriter, MemoryQueue, OutboundMessage, QueueIdentifier, WriterOptions};

pub const QUEUE_NAME: &str = "test-queue";

/// A writer over a fresh in-memory queue, plus a handle to inspect what it sent.
pub fn setup(options: WriterOptions) -> (BatchingQueueWriter<MemoryQueue>, MemoryQueue) {
    let _ = env_logger::builder().is_test(true).try_init();

    let queue = MemoryQueue::new().with_queue(QUEUE_NAME);
    let writer = BatchingQueueWriter::new(QueueIdentifier::name(QUEUE_NAME), options, queue.clone())
        .expect("valid writer arguments");

    (writer, queue)
}

pub fn payload(n: usize) -> OutboundMessage {
    json!({ "a": n }).into()
}

pub fn body(n: usize) -> String {
    format!(r#"{{"a":{}}}"#, n)
}
