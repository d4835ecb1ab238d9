//! Embedding model configuration loaded strictly from environment variables.
//!
//! # Environment variables
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)
//! - `EMBEDDING_TIMEOUT_SECS`      = request timeout (optional, default 30)

use crate::error_handler::{
    ConfigError, EmbeddingError, env_opt_u64, must_env, validate_http_endpoint,
};

/// Configuration for the embedding backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingModelConfig {
    /// Model identifier (e.g., `"all-minilm"`, `"bge-m3"`).
    pub model: String,

    /// Base URL of the Ollama server, without trailing `/api/...`.
    pub endpoint: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Apply L2 normalization to returned vectors.
    pub normalize: bool,
}

impl EmbeddingModelConfig {
    /// Builds a config for an explicit endpoint/model pair with default knobs.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            endpoint: endpoint.into(),
            timeout_secs: 30,
            normalize: true,
        }
    }

    /// Constructs the config from the environment.
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] if the endpoint or model is missing
    /// - [`ConfigError::InvalidNumber`] if a numeric variable is invalid
    /// - [`ConfigError::InvalidFormat`] if the endpoint has no http(s) scheme
    pub fn from_env() -> Result<Self, EmbeddingError> {
        let endpoint = ollama_endpoint()?;
        validate_http_endpoint("OLLAMA_URL", &endpoint)?;
        let model = must_env("EMBEDDING_MODEL")?;
        let timeout_secs = env_opt_u64("EMBEDDING_TIMEOUT_SECS")?.unwrap_or(30);

        Ok(Self {
            model,
            endpoint,
            timeout_secs,
            normalize: true,
        })
    }

    /// Checks the invariants that `from_env` enforces, for hand-built configs.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("OLLAMA_URL", self.endpoint.trim())
    }
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String, EmbeddingError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url.trim().to_string());
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}
