//! Lightweight Ollama client for embeddings.
//!
//! Talks to `POST {endpoint}/api/embeddings` and returns the vector, L2-normalized
//! when [`EmbeddingModelConfig::normalize`] is set so that cosine and dot-product
//! scores coincide on the index side.
//!
//! # Examples
//!
//! ```no_run
//! use embedding_service::{EmbeddingModelConfig, OllamaService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = OllamaService::new(EmbeddingModelConfig::new("http://localhost:11434", "all-minilm"))?;
//! let vec = svc.embeddings("a rebel hero in a dystopian future").await?;
//! println!("Embeddings dimension = {}", vec.len());
//! # Ok(()) }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::embedding_config::EmbeddingModelConfig;
use crate::error_handler::{EmbeddingError, Result, make_snippet};

/// Thin embeddings client for Ollama.
///
/// Reuses one HTTP client with the configured timeout.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: EmbeddingModelConfig,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`EmbeddingError::Config`] if the config is invalid
    /// - [`EmbeddingError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: EmbeddingModelConfig) -> Result<Self> {
        cfg.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .brotli(true)
            .build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/').to_string();
        let url_embeddings = format!("{base}/api/embeddings");

        Ok(Self {
            client,
            cfg,
            url_embeddings,
        })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EmbeddingModelConfig {
        &self.cfg
    }

    /// Retrieves an embedding via `/api/embeddings`.
    ///
    /// # Errors
    /// - [`EmbeddingError::HttpStatus`] for non-2xx responses
    /// - [`EmbeddingError::HttpTransport`] for client errors
    /// - [`EmbeddingError::Decode`] if the response cannot be parsed
    /// - [`EmbeddingError::EmptyEmbedding`] if the vector is empty
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            EmbeddingError::Decode(format!(
                "serde error: {e}; expected `{{ embedding: number[] }}`"
            ))
        })?;

        if out.embedding.is_empty() {
            return Err(EmbeddingError::EmptyEmbedding(self.cfg.model.clone()));
        }

        let mut v = out.embedding;
        if self.cfg.normalize {
            l2_normalize(&mut v);
        }
        Ok(v)
    }
}

/// Scales `v` to unit length in place. A zero vector is left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/* ==========================
HTTP payloads
========================== */

/// Request body for `/api/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response body for `/api/embeddings`.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}
