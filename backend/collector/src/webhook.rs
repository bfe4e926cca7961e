//! Webhook client — posts a finished submission to the workflow endpoint.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::errors::SubmissionError;
use crate::form::SubmissionRecord;

/// Accepts a submission. A success status is taken as proof of delivery;
/// the response body is never read.
#[async_trait]
pub trait WebhookSink: Send + Sync {
    async fn deliver(&self, record: &SubmissionRecord) -> Result<(), SubmissionError>;
}

pub struct HttpWebhook {
    client: Client,
    url: String,
}

impl HttpWebhook {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl WebhookSink for HttpWebhook {
    async fn deliver(&self, record: &SubmissionRecord) -> Result<(), SubmissionError> {
        // `.json()` sets `Content-Type: application/json`.
        let resp = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| SubmissionError::WebhookDelivery(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SubmissionError::WebhookDelivery(format!("status {status}")));
        }

        debug!("Webhook accepted submission with {status}");
        Ok(())
    }
}
