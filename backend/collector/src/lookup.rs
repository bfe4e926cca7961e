//! IP-echo client — asks a public service which address our requests come from.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::SubmissionError;

/// Resolves the caller's public IP address.
#[async_trait]
pub trait IpLookup: Send + Sync {
    async fn lookup(&self) -> Result<String, SubmissionError>;
}

/// Response shape of ipify-style services (`?format=json`).
#[derive(Debug, Deserialize)]
pub struct IpResponse {
    pub ip: String,
}

pub struct HttpIpLookup {
    client: Client,
    url: String,
}

impl HttpIpLookup {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl IpLookup for HttpIpLookup {
    async fn lookup(&self) -> Result<String, SubmissionError> {
        debug!("Resolving public IP via {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SubmissionError::IpLookup(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SubmissionError::IpLookup(format!("status {status}")));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| SubmissionError::IpLookup(e.to_string()))?;

        parse_ip(&body)
    }
}

/// Pull the `ip` string out of a lookup response body.
///
/// A body that is not JSON, lacks `ip`, or carries an empty one is a
/// malformed response rather than a lookup failure.
pub fn parse_ip(body: &[u8]) -> Result<String, SubmissionError> {
    let parsed: IpResponse = serde_json::from_slice(body)
        .map_err(|e| SubmissionError::Unknown(format!("malformed IP lookup response: {e}")))?;

    let ip = parsed.ip.trim();
    if ip.is_empty() {
        return Err(SubmissionError::Unknown(
            "IP lookup response has an empty ip".to_string(),
        ));
    }
    Ok(ip.to_string())
}
