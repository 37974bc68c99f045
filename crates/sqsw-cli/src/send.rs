use std::path::PathBuf;

use anyhow::Context;
use serde_json::Value;
use sqsw::{
    BatchingQueueWriter, Entry, MemoryQueue, OnError, OutboundMessage, PipeSummary, QueueClient,
    QueueIdentifier, SqsClient, WriterOptions,
};

use crate::reader;

const CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InputType {
    /// Every line is a JSON document; `{Id, MessageBody}` objects are sent as-is
    #[default]
    Json,
    /// Every line is sent verbatim as a message body
    Text,
}

/// AWS connection flags shared by every command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AwsArgs {
    /// Use static test credentials (for LocalStack)
    #[arg(long, global = true)]
    pub local: bool,

    /// Override the SQS endpoint, e.g. http://localhost:4566
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[arg(long, global = true)]
    pub region: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct SendArgs {
    /// Newline-delimited input file (reads from stdin if omitted)
    pub file: Option<PathBuf>,

    /// URL of the target queue
    #[arg(long, conflicts_with = "queue_name", required_unless_present = "queue_name")]
    pub queue_url: Option<String>,

    /// Name of the target queue, resolved to a URL on first write
    #[arg(long)]
    pub queue_name: Option<String>,

    /// Messages per SendMessageBatch call
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// MessageGroupId attached to every generated entry (FIFO queues)
    #[arg(long)]
    pub group_id: Option<String>,

    /// JSON file with writer options; flags take precedence
    #[arg(long)]
    pub options: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = InputType::Json)]
    pub input_type: InputType,

    /// Stop at the first message that cannot be written
    #[arg(long)]
    pub abort_on_error: bool,

    /// Print the batches as JSON lines instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

impl SendArgs {
    pub async fn run(self, aws: &AwsArgs) -> anyhow::Result<()> {
        let options = self.writer_options(aws).await?;
        let queue = QueueIdentifier {
            name: self.queue_name.clone(),
            url: self.queue_url.clone(),
        };
        let on_error = if self.abort_on_error {
            OnError::Abort
        } else {
            OnError::Continue
        };

        let (h_lines, rx_lines) = match &self.file {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("failed to open {}", path.display()))?;
                reader::lines(file, CHANNEL_CAPACITY)
            }
            None => reader::lines(tokio::io::stdin(), CHANNEL_CAPACITY),
        };
        let (h_messages, rx_messages) = messages(
            rx_lines,
            self.input_type,
            options.group_id.clone(),
            on_error,
        );

        let summary = if self.dry_run {
            let client = match queue.name.as_deref() {
                Some(name) => MemoryQueue::new().with_queue(name),
                None => MemoryQueue::new(),
            };
            let summary = write_all(queue, options, client.clone(), rx_messages, on_error).await?;
            for batch in client.batches() {
                println!("{}", serde_json::to_string(&batch)?);
            }
            summary
        } else {
            let client = SqsClient::load(&options.client_config).await;
            write_all(queue, options, client, rx_messages, on_error).await?
        };

        let rejected = h_messages.await??;
        let read = h_lines.await?.context("failed to read input")?;

        log::info!(
            "read {} lines: {} written, {} failed, {} rejected",
            read,
            summary.written,
            summary.failed,
            rejected
        );

        if let Some(err) = summary.aborted {
            return Err(anyhow::Error::new(err).context("aborted after a failed write"));
        }
        summary
            .closed
            .context("failed to flush remaining messages")?;

        Ok(())
    }

    /// Options file first, then individual flags on top.
    async fn writer_options(&self, aws: &AwsArgs) -> anyhow::Result<WriterOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let json = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?;
                WriterOptions::from_json(&json)
                    .with_context(|| format!("invalid options in {}", path.display()))?
            }
            None => WriterOptions::default(),
        };

        if let Some(batch_size) = self.batch_size {
            options.batch_size = batch_size;
        }
        if let Some(group_id) = &self.group_id {
            options.group_id = Some(group_id.clone());
        }
        if aws.local {
            options.client_config.local = true;
        }
        if let Some(endpoint) = &aws.endpoint {
            options.client_config.endpoint_url = Some(endpoint.clone());
        }
        if let Some(region) = &aws.region {
            options.client_config.region = Some(region.clone());
        }

        Ok(options)
    }
}

async fn write_all<C: QueueClient>(
    queue: QueueIdentifier,
    options: WriterOptions,
    client: C,
    rx: tokio::sync::mpsc::Receiver<OutboundMessage>,
    on_error: OnError,
) -> anyhow::Result<PipeSummary> {
    let mut writer = BatchingQueueWriter::new(queue, options, client)?;
    Ok(sqsw::pipe(rx, &mut writer, on_error).await)
}

/// Converts raw lines into messages on a separate task.
///
/// The handle resolves to the number of rejected lines. In abort mode the
/// first rejected line ends the stream and becomes the handle's error.
fn messages(
    mut rx_lines: tokio::sync::mpsc::Receiver<String>,
    input_type: InputType,
    group_id: Option<String>,
    on_error: OnError,
) -> (
    tokio::task::JoinHandle<anyhow::Result<usize>>,
    tokio::sync::mpsc::Receiver<OutboundMessage>,
) {
    let (tx, rx) = tokio::sync::mpsc::channel::<OutboundMessage>(CHANNEL_CAPACITY);

    let task = tokio::spawn(async move {
        let mut rejected = 0;
        while let Some(line) = rx_lines.recv().await {
            let message = match parse_line(line, input_type, group_id.as_deref()) {
                Ok(message) => message,
                Err(e) => {
                    if on_error == OnError::Abort {
                        return Err(e);
                    }
                    log::error!("{:#}", e);
                    rejected += 1;
                    continue;
                }
            };

            if tx.send(message).await.is_err() {
                break;
            }
        }
        Ok(rejected)
    });

    (task, rx)
}

fn parse_line(
    line: String,
    input_type: InputType,
    group_id: Option<&str>,
) -> anyhow::Result<OutboundMessage> {
    match input_type {
        InputType::Json => {
            let value: Value = serde_json::from_str(&line)
                .with_context(|| format!("line is not valid JSON: {}", line))?;
            Ok(value.into())
        }
        InputType::Text => {
            let entry = Entry::new(uuid::Uuid::new_v4().to_string(), line);
            Ok(match group_id {
                Some(group_id) => entry.with_group_id(group_id),
                None => entry,
            }
            .into())
        }
    }
}
