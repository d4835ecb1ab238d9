//! Hybrid semantic retrieval and catalog analytics over a movie collection.
//!
//! This crate provides a clean API to:
//! - Retrieve the top‑K movies for a free-text query, pre-filtered by genre
//!   and post-filtered by release year
//! - Enumerate the catalog with cursor pagination
//! - Compute genre cardinalities and mean vote per decade
//!
//! The index and the embedding model are injected behind [`VectorIndex`] and
//! [`EmbeddingsProvider`]; [`QdrantIndex`] and [`OllamaEmbedder`] are the
//! production implementations.

mod aggregate;
mod config;
mod embed;
mod errors;
mod filters;
mod index;
mod mappers;
mod qdrant_facade;
mod record;
mod retrieve;
mod scan;

pub use aggregate::decade_stats;
pub use config::{CatalogConfig, DistanceKind};
pub use embed::EmbeddingsProvider;
pub use embed::ollama::OllamaEmbedder;
pub use errors::MovieSearchError;
pub use filters::{FilterClause, GENRES_FIELD, StructuredFilter, build_genre_filter, filter_matches};
pub use index::{IndexFuture, IndexHit, ScrollPage, VectorIndex};
pub use mappers::map_movie_payload;
pub use qdrant_facade::QdrantIndex;
pub use record::{
    CollectionStatus, DecadeStat, GenreCount, MoviePayload, PointKey, ScoredHit, SearchQuery,
    YearRange, decade_of, parse_year,
};
pub use scan::distinct_genres;

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

/// High-level facade that wires configuration, index, and embedding provider.
///
/// Built once at startup and shared read-only; this is the single entry point
/// recommended for application code.
#[derive(Clone)]
pub struct MovieCatalog {
    cfg: CatalogConfig,
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl MovieCatalog {
    /// Assembles a catalog without contacting the index.
    pub fn new(
        cfg: CatalogConfig,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingsProvider>,
    ) -> Self {
        trace!("MovieCatalog::new collection={}", cfg.collection);
        Self {
            cfg,
            index,
            embedder,
        }
    }

    /// Assembles a catalog and performs the startup check against the index.
    ///
    /// # Errors
    /// - `Configuration` if the config does not validate
    /// - `IndexUnavailable` if collection info cannot be fetched
    /// - `VectorSizeMismatch` if the collection's vector size differs from
    ///   `cfg.embedding_dim`
    pub async fn connect(
        cfg: CatalogConfig,
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingsProvider>,
    ) -> Result<Self, MovieSearchError> {
        cfg.validate()?;
        let catalog = Self::new(cfg, index, embedder);
        let status = catalog.index.collection_info().await?;

        match status.vector_size {
            Some(size) if size as usize != catalog.cfg.embedding_dim => {
                return Err(MovieSearchError::VectorSizeMismatch {
                    got: catalog.cfg.embedding_dim,
                    want: size as usize,
                });
            }
            Some(_) => {}
            None => warn!(
                collection = %catalog.cfg.collection,
                "collection does not report a single vector size; skipping dimension check"
            ),
        }
        if let Some(d) = status.distance {
            if d != catalog.cfg.distance {
                warn!(
                    "Collection distance {:?} differs from configured {:?}",
                    d, catalog.cfg.distance
                );
            }
        }

        info!(
            target: "movie_search::startup",
            collection = %catalog.cfg.collection,
            points = status.points_count,
            dim = catalog.cfg.embedding_dim,
            "catalog ready"
        );
        Ok(catalog)
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.cfg
    }

    /// Semantic search; see [`SearchQuery`] for the filter semantics.
    ///
    /// # Errors
    /// `InvalidArgument`, `EmbeddingUnavailable`, `VectorSizeMismatch`, or
    /// `IndexUnavailable`.
    pub async fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<ScoredHit>, MovieSearchError> {
        debug!("MovieCatalog::search top_k={}", query.top_k);
        retrieve::search(&self.cfg, self.index.as_ref(), self.embedder.as_ref(), query).await
    }

    /// Enumerates payloads matching `filter`, using the configured page size.
    ///
    /// # Errors
    /// `ScanFailed` if any page request fails.
    pub async fn scan(
        &self,
        filter: Option<&StructuredFilter>,
        limit_total: Option<usize>,
    ) -> Result<Vec<MoviePayload>, MovieSearchError> {
        scan::scan(self.index.as_ref(), filter, self.cfg.scan_page_size, limit_total).await
    }

    /// Genres seen in the first `sample` payloads (config default when `None`).
    ///
    /// # Errors
    /// `ScanFailed` if the sampling scan fails.
    pub async fn list_known_genres(
        &self,
        sample: Option<usize>,
    ) -> Result<Vec<String>, MovieSearchError> {
        let sample = sample.unwrap_or(self.cfg.genre_sample);
        scan::list_known_genres(self.index.as_ref(), self.cfg.scan_page_size, sample).await
    }

    /// Exact count per genre, sorted by count descending.
    ///
    /// # Errors
    /// `IndexUnavailable` if any count fails.
    pub async fn counts_by_genre<S: AsRef<str>>(
        &self,
        genres: &[S],
    ) -> Result<Vec<GenreCount>, MovieSearchError> {
        aggregate::counts_by_genre(self.index.as_ref(), genres).await
    }

    /// Mean vote per decade start, sorted ascending.
    ///
    /// # Errors
    /// `ScanFailed` if the catalog scan fails.
    pub async fn decade_mean_vote(&self, decades: &[i32]) -> Result<Vec<DecadeStat>, MovieSearchError> {
        aggregate::decade_mean_vote(self.index.as_ref(), self.cfg.scan_page_size, decades).await
    }

    /// Collection facts as reported by the index.
    ///
    /// # Errors
    /// `IndexUnavailable` if the index cannot be reached.
    pub async fn status(&self) -> Result<CollectionStatus, MovieSearchError> {
        self.index.collection_info().await
    }
}
