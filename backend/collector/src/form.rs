//! Form state and the submission lifecycle.
//!
//! ## Status as a Finite-State Machine
//!
//! [`SubmissionStatus`] moves only along these edges:
//!
//! ```text
//! Idle ──submit(valid)──► Loading ──both calls ok──► Success ──reset──► Idle
//!   ▲                        │
//!   │                        └──lookup / webhook fails──► Error ──submit──► Loading
//!   └── submit(invalid): stays put, error message set
//! ```
//!
//! Every change goes through [`FormState::handle`]: state + event → new state
//! plus an optional [`Effect`] for the caller to execute. The state object
//! never performs I/O itself.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::SubmissionError;

/// The two user-editable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Project,
}

/// Raw, untrimmed form input exactly as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub name: String,
    pub project: String,
}

impl FormInput {
    pub fn new(name: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project: project.into(),
        }
    }

    /// Both fields are non-empty after trimming.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.project.trim().is_empty()
    }

    /// Trimmed copy used to build the submission payload.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            project: self.project.trim().to_string(),
        }
    }
}

/// Snapshot of one successful submission. This is also the webhook body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub name: String,
    pub project: String,
    pub ip_address: String,
    pub timestamp: String,
}

impl SubmissionRecord {
    /// Fixed multi-line block placed on the clipboard by the copy action.
    pub fn copy_text(&self) -> String {
        format!(
            "Name: {}\nProject: {}\nIP Address: {}\nTimestamp: {}",
            self.name, self.project, self.ip_address, self.timestamp
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Inputs to the state machine.
#[derive(Debug, Clone)]
pub enum FormEvent {
    Edit { field: Field, value: String },
    Submit,
    /// Outcome of the pipeline run started for `attempt`.
    Completed {
        attempt: u64,
        outcome: Result<SubmissionRecord, SubmissionError>,
    },
    Reset,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the submission pipeline for this input and report back with
    /// [`FormEvent::Completed`] carrying the same `attempt`.
    RunPipeline { attempt: u64, input: FormInput },
}

/// Serializable view of the whole state, used by `GET /api/state`.
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub status: SubmissionStatus,
    pub name: String,
    pub project: String,
    pub valid: bool,
    pub error: Option<String>,
    pub record: Option<SubmissionRecord>,
}

/// The single owned page state.
#[derive(Debug, Clone)]
pub struct FormState {
    input: FormInput,
    status: SubmissionStatus,
    error: Option<String>,
    record: Option<SubmissionRecord>,
    attempt: u64,
    destination: String,
}

impl FormState {
    /// `destination` is the display name used in the webhook failure message.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            input: FormInput::default(),
            status: SubmissionStatus::Idle,
            error: None,
            record: None,
            attempt: 0,
            destination: destination.into(),
        }
    }

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn record(&self) -> Option<&SubmissionRecord> {
        self.record.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.input.is_valid()
    }

    pub fn is_loading(&self) -> bool {
        self.status == SubmissionStatus::Loading
    }

    /// Overwrite a field without trimming. Ignored while a submission is in
    /// flight; returns whether the edit was applied.
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        if self.is_loading() {
            debug!(?field, "Edit ignored while loading");
            return false;
        }
        let value = value.into();
        match field {
            Field::Name => self.input.name = value,
            Field::Project => self.input.project = value,
        }
        true
    }

    /// Back to an empty idle form. Any pipeline still running for an earlier
    /// attempt will have its outcome discarded.
    pub fn reset(&mut self) {
        self.input = FormInput::default();
        self.record = None;
        self.status = SubmissionStatus::Idle;
        self.error = None;
        self.attempt += 1;
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            status: self.status,
            name: self.input.name.clone(),
            project: self.input.project.clone(),
            valid: self.is_valid(),
            error: self.error.clone(),
            record: self.record.clone(),
        }
    }

    /// Apply one event and return the side effect it asks for, if any.
    pub fn handle(&mut self, event: FormEvent) -> Option<Effect> {
        match event {
            FormEvent::Edit { field, value } => {
                self.update_field(field, value);
                None
            }
            FormEvent::Submit => self.begin_submission(),
            FormEvent::Completed { attempt, outcome } => {
                self.complete(attempt, outcome);
                None
            }
            FormEvent::Reset => {
                self.reset();
                None
            }
        }
    }

    fn begin_submission(&mut self) -> Option<Effect> {
        match self.status {
            SubmissionStatus::Loading | SubmissionStatus::Success => {
                debug!(status = ?self.status, "Submit ignored");
                return None;
            }
            SubmissionStatus::Idle | SubmissionStatus::Error => {}
        }

        if !self.is_valid() {
            self.error = Some(SubmissionError::Validation.message(&self.destination));
            return None;
        }

        self.attempt += 1;
        self.status = SubmissionStatus::Loading;
        self.error = None;
        self.record = None;

        Some(Effect::RunPipeline {
            attempt: self.attempt,
            input: self.input.clone(),
        })
    }

    fn complete(&mut self, attempt: u64, outcome: Result<SubmissionRecord, SubmissionError>) {
        if !self.is_loading() || attempt != self.attempt {
            debug!(attempt, current = self.attempt, "Discarding stale pipeline outcome");
            return;
        }

        match outcome {
            Ok(record) => {
                self.record = Some(record);
                self.status = SubmissionStatus::Success;
            }
            Err(err) => {
                self.record = None;
                self.error = Some(err.message(&self.destination));
                self.status = SubmissionStatus::Error;
            }
        }
    }
}
