//! Application configuration loaded from environment variables.

use crate::errors::{CollectorError, Result};

pub const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Workflow-automation endpoint that receives each submission
    pub webhook_url: String,
    /// Display name of the system behind the webhook (used in error messages)
    pub webhook_destination: String,
    /// Public IP-echo service returning `{"ip": "..."}`
    pub ip_lookup_url: String,
    /// Interface the page is served on
    pub api_host: String,
    /// Port the page is served on
    pub api_port: u16,
    /// Per-request timeout for both outbound calls
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` is the only
    /// production caller; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            webhook_url: get("WEBHOOK_URL").ok_or_else(|| {
                CollectorError::Config("WEBHOOK_URL environment variable is required".to_string())
            })?,
            webhook_destination: get("WEBHOOK_DESTINATION").unwrap_or_else(|| "Teams".to_string()),
            ip_lookup_url: get("IP_LOOKUP_URL")
                .unwrap_or_else(|| DEFAULT_IP_LOOKUP_URL.to_string()),
            api_host: get("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            api_port: get("API_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| CollectorError::Config("Invalid API_PORT".to_string()))?,
            http_timeout_secs: get("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| CollectorError::Config("Invalid HTTP_TIMEOUT_SECS".to_string()))?,
        })
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_webhook_is_set() {
        let config = load(&[("WEBHOOK_URL", "https://hooks.example.test/run")]).unwrap();
        assert_eq!(config.webhook_url, "https://hooks.example.test/run");
        assert_eq!(config.webhook_destination, "Teams");
        assert_eq!(config.ip_lookup_url, DEFAULT_IP_LOOKUP_URL);
        assert_eq!(config.api_address(), "127.0.0.1:3000");
        assert_eq!(config.http_timeout_secs, 30);
    }

    #[test]
    fn webhook_url_is_required() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, CollectorError::Config(msg) if msg.contains("WEBHOOK_URL")));

        let err = load(&[("WEBHOOK_URL", "   ")]).unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = load(&[("WEBHOOK_URL", "https://x.test"), ("API_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, CollectorError::Config(msg) if msg == "Invalid API_PORT"));
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("WEBHOOK_URL", "https://x.test"),
            ("WEBHOOK_DESTINATION", "Slack"),
            ("API_PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.webhook_destination, "Slack");
        assert_eq!(config.api_port, 8080);
    }
}
