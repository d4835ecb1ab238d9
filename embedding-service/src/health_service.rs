//! Startup health probe for the embedding backend.
//!
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//!
//! [`HealthService::check`] never fails; errors are mapped to `ok = false`
//! so callers can decide whether an unhealthy backend is fatal.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::embedding_config::EmbeddingModelConfig;
use crate::error_handler::{EmbeddingError, Result, make_snippet};

/// A serializable health snapshot for the embedding backend.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier the probe looked for.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

/// Health checker with its own short-timeout HTTP client.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds, default 10).
    ///
    /// # Errors
    /// Returns [`EmbeddingError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Probes the backend described by `cfg`.
    pub async fn check(&self, cfg: &EmbeddingModelConfig) -> HealthStatus {
        let start = Instant::now();
        match self.try_probe_ollama(cfg).await {
            Ok((ok, message)) => {
                let status = HealthStatus {
                    endpoint: cfg.endpoint.clone(),
                    model: cfg.model.clone(),
                    ok,
                    latency_ms: start.elapsed().as_millis(),
                    message,
                };
                info!(
                    endpoint = %status.endpoint,
                    model = %status.model,
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "embedding health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus {
                    endpoint: cfg.endpoint.clone(),
                    model: cfg.model.clone(),
                    ok: false,
                    latency_ms: start.elapsed().as_millis(),
                    message: err.to_string(),
                };
                warn!(
                    endpoint = %status.endpoint,
                    model = %status.model,
                    message = %status.message,
                    "embedding health probe failed"
                );
                status
            }
        }
    }

    /// Strict Ollama probe: 2xx from `/api/tags`, then a best-effort model lookup.
    async fn try_probe_ollama(&self, cfg: &EmbeddingModelConfig) -> Result<(bool, String)> {
        let url = format!("{}/api/tags", cfg.endpoint.trim().trim_end_matches('/'));
        debug!(model = %cfg.model, "GET {}", url);

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        // Expected minimal JSON: { "models": [ { "name": "<model>" }, ... ] }
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            models: Option<Vec<Tag>>,
        }

        match resp.json::<Tags>().await {
            Ok(Tags {
                models: Some(models),
            }) => {
                // Ollama reports tagged names (`all-minilm:latest`) for untagged requests.
                let exists = models.iter().any(|m| {
                    m.name == cfg.model || m.name.split(':').next() == Some(cfg.model.as_str())
                });
                if exists {
                    Ok((true, "Ollama is healthy; model is available".into()))
                } else {
                    Ok((false, "Ollama is up, but model not found in /api/tags".into()))
                }
            }
            Ok(Tags { models: None }) => Ok((
                true,
                "Ollama is healthy; tags response without `models` field".into(),
            )),
            Err(e) => Ok((
                true,
                format!("Ollama is reachable; failed to decode /api/tags: {e}"),
            )),
        }
    }
}
