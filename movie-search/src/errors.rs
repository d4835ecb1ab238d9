//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for movie-search operations.
///
/// Configuration variants are fatal at startup (see [`MovieSearchError::is_fatal`]);
/// the others fail the single operation in progress and are surfaced to the caller.
/// Malformed payload fields never show up here: they are skipped locally.
#[derive(Debug, Error)]
pub enum MovieSearchError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Required environment variable is missing or empty.
    #[error("missing env variable: {key}")]
    EnvMissing { key: String },

    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Invalid or unsupported configuration (credentials, collection name, client setup).
    #[error("config error: {0}")]
    Configuration(String),

    /// Embedding dimension differs from the collection's vector size.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    // ── Collaborators ───────────────────────────────────────────────────────
    /// The embedding provider is unreachable or failed to embed the query.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// A vector index call (search, count, collection info) failed.
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),

    /// A cursor scan failed part-way; already fetched pages are discarded.
    #[error("scan failed after {pages_fetched} page(s): {reason}")]
    ScanFailed { pages_fetched: usize, reason: String },

    // ── Caller errors ───────────────────────────────────────────────────────
    /// A request parameter violates its precondition (e.g. `top_k == 0`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl MovieSearchError {
    /// `true` for errors that must halt startup instead of failing one request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EnvMissing { .. }
                | Self::EnvParse { .. }
                | Self::Configuration(_)
                | Self::VectorSizeMismatch { .. }
        )
    }
}

impl From<embedding_service::EmbeddingError> for MovieSearchError {
    fn from(e: embedding_service::EmbeddingError) -> Self {
        match e {
            embedding_service::EmbeddingError::Config(c) => Self::Configuration(c.to_string()),
            other => Self::EmbeddingUnavailable(other.to_string()),
        }
    }
}
