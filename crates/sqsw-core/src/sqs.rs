//! AWS SQS implementation of [`QueueClient`].

use anyhow::Context;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sqs as sqs;
use sqs::error::{DisplayErrorContext, SdkError};
use sqs::types::SendMessageBatchRequestEntry;

use crate::client::{BatchAck, FailedEntry, QueueClient};
use crate::config::ClientConfig;
use crate::message::Entry;

/// Talks to SQS through the official SDK.
///
/// # Example
///
/// ```no_run
/// use sqsw::{ClientConfig, SqsClient};
///
/// # async fn example() {
/// let client = SqsClient::load(&ClientConfig {
///     endpoint_url: Some("http://localhost:4566".to_string()),
///     local: true,
///     ..Default::default()
/// })
/// .await;
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SqsClient {
    /// The AWS SDK configuration used for SQS operations
    pub config: SdkConfig,
    pub client: sqs::Client,
}

impl SqsClient {
    /// Creates a client from a pre-built AWS SDK config.
    pub fn from_config(config: SdkConfig) -> Self {
        let client = sqs::Client::new(&config);
        Self { config, client }
    }

    /// Loads AWS configuration from the environment, applying `settings` on top.
    ///
    /// The region falls back to the default provider chain and then `us-east-1`.
    /// With `local` set, static `test` credentials are installed so the client
    /// can talk to LocalStack.
    pub async fn load(settings: &ClientConfig) -> Self {
        use aws_config::meta::region::RegionProviderChain;

        let region = match settings.region.clone() {
            Some(region) => RegionProviderChain::first_try(aws_config::Region::new(region)),
            None => RegionProviderChain::default_provider(),
        }
        .or_else(aws_config::Region::from_static("us-east-1"));

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

        if let Some(endpoint) = settings.endpoint_url.as_deref() {
            loader = loader.endpoint_url(endpoint);
        }

        if settings.local {
            loader = loader.credentials_provider(sqs::config::Credentials::new(
                "test", "test", None, None, "static",
            ));
        }

        Self::from_config(loader.load().await)
    }
}

#[async_trait]
impl QueueClient for SqsClient {
    async fn resolve_address(&self, name: &str) -> anyhow::Result<String> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(name)
            .send()
            .await
            .map_err(|e| sdk_error("GetQueueUrl", e))?;

        output
            .queue_url()
            .map(str::to_string)
            .with_context(|| format!("no url returned for queue '{}'", name))
    }

    async fn submit_batch(&self, entries: &[Entry], address: &str) -> anyhow::Result<BatchAck> {
        // SQS doesn't allow empty batch requests
        if entries.is_empty() {
            return Ok(BatchAck::default());
        }

        let request_entries = entries
            .iter()
            .map(|entry| {
                SendMessageBatchRequestEntry::builder()
                    .id(&entry.id)
                    .message_body(&entry.body)
                    .set_message_group_id(entry.group_id.clone())
                    .build()
                    .with_context(|| format!("failed to build message entry '{}'", entry.id))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let output = self
            .client
            .send_message_batch()
            .queue_url(address)
            .set_entries(Some(request_entries))
            .send()
            .await
            .map_err(|e| sdk_error("SendMessageBatch", e))?;

        Ok(BatchAck {
            successful: output
                .successful()
                .iter()
                .map(|s| s.id().to_string())
                .collect(),
            failed: output
                .failed()
                .iter()
                .map(|f| FailedEntry {
                    id: f.id().to_string(),
                    code: f.code().to_string(),
                    message: f.message().map(str::to_string),
                    sender_fault: f.sender_fault(),
                })
                .collect(),
        })
    }
}

fn sdk_error<E>(operation: &str, err: SdkError<E>) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    match &err {
        // the primary AWS service error message from the response
        SdkError::ServiceError(se) => anyhow::anyhow!("{} failed: {}", operation, se.err()),
        // timeouts, dispatch failures and the like
        _ => anyhow::anyhow!("{} failed: {}", operation, DisplayErrorContext(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_queue, localstack, unique_queue_name};

    fn local_settings(endpoint_url: &str) -> ClientConfig {
        ClientConfig {
            region: Some("us-east-1".to_string()),
            endpoint_url: Some(endpoint_url.to_string()),
            local: true,
        }
    }

    #[tokio::test]
    async fn empty_batch_is_not_sent() {
        let client = SqsClient::load(&local_settings("http://127.0.0.1:9")).await;
        let ack = client
            .submit_batch(&[], "http://127.0.0.1:9/000000000000/nowhere")
            .await
            .unwrap();
        assert_eq!(ack, BatchAck::default());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn resolves_and_submits_against_localstack() {
        let (endpoint_url, container) = localstack().await.unwrap();
        let queue_name = unique_queue_name("test-batch");
        create_test_queue(&container, &queue_name).await.unwrap();

        let client = SqsClient::load(&local_settings(&endpoint_url)).await;
        let address = client.resolve_address(&queue_name).await.unwrap();
        assert!(address.ends_with(&queue_name));

        let entries = vec![
            Entry::new("1", "message1"),
            Entry::new("2", "message2"),
            Entry::new("3", "message3"),
        ];
        let ack = client.submit_batch(&entries, &address).await.unwrap();
        assert_eq!(ack.successful.len(), 3);
        assert!(ack.failed.is_empty());

        // Verify messages were actually sent by receiving them
        let received = client
            .client
            .receive_message()
            .queue_url(&address)
            .max_number_of_messages(10)
            .send()
            .await
            .unwrap()
            .messages
            .unwrap_or_default();
        let mut bodies: Vec<&str> = received.iter().map(|m| m.body().unwrap_or("")).collect();
        bodies.sort();
        assert_eq!(bodies, vec!["message1", "message2", "message3"]);

        container.stop().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn unknown_queue_fails_resolution() {
        let (endpoint_url, container) = localstack().await.unwrap();

        let client = SqsClient::load(&local_settings(&endpoint_url)).await;
        let err = client
            .resolve_address(&unique_queue_name("missing"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("GetQueueUrl failed"));

        container.stop().await.unwrap();
    }
}
