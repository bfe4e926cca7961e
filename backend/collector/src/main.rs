//! IP exclusion form — entry point.
//!
//! Serves a single page asking for a name and a client project. On submit the
//! service resolves this machine's public IP through an IP-echo service and
//! posts `{name, project, ipAddress, timestamp}` to the configured workflow
//! webhook, then shows a summary that can be copied to the clipboard.

mod api;
mod clipboard;
mod config;
mod errors;
mod form;
mod lookup;
mod pipeline;
mod presenter;
mod webhook;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::ApiState;
use clipboard::SystemClipboard;
use config::Config;
use form::FormState;
use lookup::HttpIpLookup;
use pipeline::SubmissionPipeline;
use webhook::HttpWebhook;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // One client for both outbound calls.
    let client = Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let pipeline = SubmissionPipeline::new(
        Arc::new(HttpIpLookup::new(client.clone(), config.ip_lookup_url.clone())),
        Arc::new(HttpWebhook::new(client, config.webhook_url.clone())),
    );

    let state = Arc::new(ApiState::new(
        FormState::new(config.webhook_destination.clone()),
        pipeline,
        Arc::new(SystemClipboard::new()),
    ));

    let app = api::router(state).layer(TraceLayer::new_for_http());

    let addr = config.api_address();
    info!(
        "Forwarding submissions to {} via {}",
        config.webhook_destination, config.ip_lookup_url
    );
    info!("Form available at http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
