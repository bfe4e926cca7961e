//! Axum handlers for the page and its actions.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::clipboard::Clipboard;
use crate::form::{Field, FormEvent, FormState, SubmissionStatus};
use crate::pipeline::{self, SubmissionPipeline};
use crate::presenter::{self, Notification};

pub struct ApiState {
    pub form: Arc<Mutex<FormState>>,
    pub pipeline: Arc<SubmissionPipeline>,
    pub clipboard: Arc<dyn Clipboard>,
    /// Toast waiting to be shown on the next page render.
    pub notice: Mutex<Option<Notification>>,
}

impl ApiState {
    pub fn new(
        form: FormState,
        pipeline: SubmissionPipeline,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            form: Arc::new(Mutex::new(form)),
            pipeline: Arc::new(pipeline),
            clipboard,
            notice: Mutex::new(None),
        }
    }
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/submit", post(submit))
        .route("/copy", post(copy))
        .route("/reset", post(reset))
        .route("/api/state", get(form_state))
        .route("/health", get(health))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

/// Browsers omit disabled inputs, so both fields may be missing.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /`
///
/// Renders the form or the success summary. A pending toast is shown once.
pub async fn page(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let notice = state.notice.lock().await.take();
    let form = state.form.lock().await;
    Html(presenter::render_page(&form, notice.as_ref()))
}

/// `POST /submit`
///
/// Applies the typed values, then the submit event. A valid submission starts
/// the pipeline in the background; the page polls until it settles. The body
/// is ignored unless the form is actually on screen and editable.
pub async fn submit(
    State(state): State<Arc<ApiState>>,
    Form(body): Form<SubmitForm>,
) -> impl IntoResponse {
    let effect = {
        let mut form = state.form.lock().await;
        let editable = matches!(
            form.status(),
            SubmissionStatus::Idle | SubmissionStatus::Error
        );
        let (name, project) = if editable {
            (body.name, body.project)
        } else {
            debug!(status = ?form.status(), "Ignoring submitted fields");
            (None, None)
        };
        if let Some(name) = name {
            form.handle(FormEvent::Edit {
                field: Field::Name,
                value: name,
            });
        }
        if let Some(project) = project {
            form.handle(FormEvent::Edit {
                field: Field::Project,
                value: project,
            });
        }
        form.handle(FormEvent::Submit)
    };

    match effect {
        Some(effect) => {
            tokio::spawn(pipeline::run(
                state.form.clone(),
                state.pipeline.clone(),
                effect,
            ));
        }
        None => debug!("Submit produced no pipeline run"),
    }

    Redirect::to("/")
}

/// `POST /copy`
pub async fn copy(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let record = state.form.lock().await.record().cloned();

    if let Some(record) = record {
        let notice = presenter::copy_record(state.clipboard.as_ref(), &record).await;
        *state.notice.lock().await = Some(notice);
    }

    Redirect::to("/")
}

/// `POST /reset` — "Submit another".
pub async fn reset(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    state.form.lock().await.handle(FormEvent::Reset);
    *state.notice.lock().await = None;
    Redirect::to("/")
}

/// `GET /api/state`
pub async fn form_state(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(state.form.lock().await.snapshot())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
