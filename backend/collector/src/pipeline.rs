//! Submission pipeline — IP lookup, then webhook delivery.
//!
//! The two calls run strictly in order and the first failure short-circuits:
//! the webhook is never contacted unless the lookup produced an address.
//! Nothing is retried; a resubmission starts over with a fresh lookup and a
//! fresh timestamp.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::errors::SubmissionError;
use crate::form::{Effect, FormEvent, FormInput, FormState, SubmissionRecord};
use crate::lookup::IpLookup;
use crate::webhook::WebhookSink;

pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

/// Local wall-clock time in the familiar `10/18/2026, 9:30:00 AM` shape.
pub fn local_timestamp() -> String {
    Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

pub struct SubmissionPipeline {
    lookup: Arc<dyn IpLookup>,
    webhook: Arc<dyn WebhookSink>,
    clock: Clock,
}

impl SubmissionPipeline {
    pub fn new(lookup: Arc<dyn IpLookup>, webhook: Arc<dyn WebhookSink>) -> Self {
        Self {
            lookup,
            webhook,
            clock: Arc::new(local_timestamp),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Run one submission end to end.
    pub async fn submit(&self, input: &FormInput) -> Result<SubmissionRecord, SubmissionError> {
        if !input.is_valid() {
            return Err(SubmissionError::Validation);
        }
        let input = input.trimmed();

        let ip_address = self.lookup.lookup().await?;

        // Captured only once the address is known.
        let timestamp = (self.clock)();

        let record = SubmissionRecord {
            name: input.name,
            project: input.project,
            ip_address,
            timestamp,
        };

        self.webhook.deliver(&record).await?;

        Ok(record)
    }
}

/// Execute an [`Effect`] and feed its outcome back into the shared state.
///
/// The state lock is taken only after the pipeline has finished, never across
/// a network call, so the page stays readable while this runs.
pub async fn run(state: Arc<Mutex<FormState>>, pipeline: Arc<SubmissionPipeline>, effect: Effect) {
    let Effect::RunPipeline { attempt, input } = effect;

    info!(attempt, "Submission started");
    let outcome = pipeline.submit(&input).await;

    match &outcome {
        Ok(record) => info!(attempt, ip = %record.ip_address, "Submission delivered"),
        Err(e) => error!(attempt, "Submission error: {e}"),
    }

    state
        .lock()
        .await
        .handle(FormEvent::Completed { attempt, outcome });
}
