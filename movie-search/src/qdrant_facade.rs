//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions live behind [`QdrantIndex`], which implements
//! [`VectorIndex`] and hides the builder API from the rest of the crate.
//! Every client failure is mapped to [`MovieSearchError::IndexUnavailable`].

use std::time::Duration;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CountPointsBuilder, Distance, ScrollPointsBuilder, SearchParamsBuilder, SearchPointsBuilder,
    vectors_config::Config as VectorsConfigKind,
};
use tracing::{debug, info};

use crate::config::{CatalogConfig, DistanceKind};
use crate::errors::MovieSearchError;
use crate::filters::{StructuredFilter, to_qdrant_filter};
use crate::index::{IndexFuture, IndexHit, ScrollPage, VectorIndex};
use crate::mappers::{map_qdrant_payload, point_key, to_point_id};
use crate::record::{CollectionStatus, PointKey};

/// A facade over the Qdrant client bound to one collection.
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
    exact: bool,
}

impl QdrantIndex {
    /// Builds the client from configuration. Does not touch the network.
    ///
    /// # Errors
    /// Returns `MovieSearchError::Configuration` if the config is invalid or the
    /// client cannot be constructed.
    pub fn new(cfg: &CatalogConfig) -> Result<Self, MovieSearchError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url)
            .timeout(Duration::from_secs(cfg.timeout_secs));
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| MovieSearchError::Configuration(format!("qdrant client build: {e}")))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            exact: cfg.exact_search,
        })
    }

    async fn search_impl(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&StructuredFilter>,
    ) -> Result<Vec<IndexHit>, MovieSearchError> {
        debug!(
            "Searching in '{}' with top_k={}, filtered={}, exact={}",
            self.collection,
            top_k,
            filter.is_some(),
            self.exact
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if let Some(f) = filter {
            builder = builder.filter(to_qdrant_filter(f));
        }
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| MovieSearchError::IndexUnavailable(format!("search_points: {e}")))?;

        let hits = res
            .result
            .into_iter()
            .map(|sp| IndexHit {
                id: point_key(sp.id),
                score: sp.score,
                payload: map_qdrant_payload(sp.payload),
            })
            .collect::<Vec<_>>();

        debug!("Search completed: {} hits returned", hits.len());
        Ok(hits)
    }

    async fn count_impl(&self, filter: Option<&StructuredFilter>) -> Result<u64, MovieSearchError> {
        let mut builder = CountPointsBuilder::new(&self.collection).exact(true);
        if let Some(f) = filter {
            builder = builder.filter(to_qdrant_filter(f));
        }

        let res = self
            .client
            .count(builder)
            .await
            .map_err(|e| MovieSearchError::IndexUnavailable(format!("count: {e}")))?;

        Ok(res.result.map(|r| r.count).unwrap_or(0))
    }

    async fn scroll_impl(
        &self,
        filter: Option<&StructuredFilter>,
        limit: u32,
        cursor: Option<PointKey>,
    ) -> Result<ScrollPage, MovieSearchError> {
        let mut builder = ScrollPointsBuilder::new(&self.collection)
            .limit(limit)
            .with_payload(true)
            .with_vectors(false);
        if let Some(f) = filter {
            builder = builder.filter(to_qdrant_filter(f));
        }
        if let Some(c) = &cursor {
            builder = builder.offset(to_point_id(c));
        }

        let res = self
            .client
            .scroll(builder)
            .await
            .map_err(|e| MovieSearchError::IndexUnavailable(format!("scroll: {e}")))?;

        Ok(ScrollPage {
            points: res
                .result
                .into_iter()
                .map(|p| map_qdrant_payload(p.payload))
                .collect(),
            next_cursor: point_key(res.next_page_offset),
        })
    }

    async fn collection_info_impl(&self) -> Result<CollectionStatus, MovieSearchError> {
        let res = self
            .client
            .collection_info(&self.collection)
            .await
            .map_err(|e| {
                MovieSearchError::IndexUnavailable(format!(
                    "collection_info '{}': {e}",
                    self.collection
                ))
            })?;

        let info = res.result.ok_or_else(|| {
            MovieSearchError::IndexUnavailable(format!(
                "collection_info '{}': empty response",
                self.collection
            ))
        })?;

        let params = info
            .config
            .as_ref()
            .and_then(|c| c.params.as_ref())
            .and_then(|p| p.vectors_config.as_ref())
            .and_then(|v| v.config.as_ref())
            .and_then(|c| match c {
                VectorsConfigKind::Params(p) => Some(p),
                VectorsConfigKind::ParamsMap(_) => None,
            });

        let status = CollectionStatus {
            points_count: info.points_count.unwrap_or(0),
            vector_size: params.map(|p| p.size),
            distance: params.and_then(|p| match Distance::try_from(p.distance) {
                Ok(Distance::Cosine) => Some(DistanceKind::Cosine),
                Ok(Distance::Dot) => Some(DistanceKind::Dot),
                _ => None,
            }),
        };

        info!(
            "Collection '{}': points={} vector_size={:?}",
            self.collection, status.points_count, status.vector_size
        );
        Ok(status)
    }
}

impl VectorIndex for QdrantIndex {
    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&'a StructuredFilter>,
    ) -> IndexFuture<'a, Vec<IndexHit>> {
        Box::pin(self.search_impl(vector, top_k, filter))
    }

    fn count<'a>(&'a self, filter: Option<&'a StructuredFilter>) -> IndexFuture<'a, u64> {
        Box::pin(self.count_impl(filter))
    }

    fn scroll<'a>(
        &'a self,
        filter: Option<&'a StructuredFilter>,
        limit: u32,
        cursor: Option<PointKey>,
    ) -> IndexFuture<'a, ScrollPage> {
        Box::pin(self.scroll_impl(filter, limit, cursor))
    }

    fn collection_info(&self) -> IndexFuture<'_, CollectionStatus> {
        Box::pin(self.collection_info_impl())
    }
}
