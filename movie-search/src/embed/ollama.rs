//! Ollama embedding provider backed by `embedding-service`.

use std::sync::Arc;

use embedding_service::OllamaService;

use crate::{EmbeddingsProvider, MovieSearchError};

/// Ollama embedding provider (async).
#[derive(Clone)]
pub struct OllamaEmbedder {
    svc: Arc<OllamaService>,
    dim: usize,
}

impl OllamaEmbedder {
    /// Wraps a shared service; `dim` is the dimension every vector must have.
    pub fn new(svc: Arc<OllamaService>, dim: usize) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<f32>, MovieSearchError>> + Send + 'a>,
    > {
        Box::pin(async move {
            let resp = self.svc.embeddings(text).await?;

            if resp.len() != self.dim {
                return Err(MovieSearchError::VectorSizeMismatch {
                    got: resp.len(),
                    want: self.dim,
                });
            }

            Ok(resp)
        })
    }
}
