use crate::errors::MovieSearchError;
use std::{future::Future, pin::Pin};

/// Asynchronous embedding provider.
///
/// Implement this trait to plug in your own embedding backend (Ollama, a local
/// model, a test double). Implementations return unit-norm vectors of a fixed
/// dimension and map their failures to [`MovieSearchError::EmbeddingUnavailable`].
pub trait EmbeddingsProvider: Send + Sync {
    /// Async embedding function.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, MovieSearchError>> + Send + 'a>>;
}

pub mod ollama;
