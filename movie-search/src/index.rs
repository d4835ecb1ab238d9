//! Vector index abstraction consumed by the retrieval and aggregation code.
//!
//! Implement this trait to plug in a different store; the production
//! implementation is [`crate::QdrantIndex`].

use std::{future::Future, pin::Pin};

use crate::errors::MovieSearchError;
use crate::filters::StructuredFilter;
use crate::record::{CollectionStatus, MoviePayload, PointKey};

/// Boxed future returned by index operations.
pub type IndexFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, MovieSearchError>> + Send + 'a>>;

/// Raw nearest-neighbour hit, before residual filtering and ranking.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexHit {
    pub id: Option<PointKey>,
    pub score: f32,
    pub payload: MoviePayload,
}

/// One page of a cursor scan.
#[derive(Clone, Debug, Default)]
pub struct ScrollPage {
    pub points: Vec<MoviePayload>,
    /// Cursor for the next page; `None` once the index is exhausted.
    pub next_cursor: Option<PointKey>,
}

/// Store holding one vector and one payload per movie.
pub trait VectorIndex: Send + Sync {
    /// Nearest `top_k` items by descending similarity, pre-filtered by `filter`.
    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&'a StructuredFilter>,
    ) -> IndexFuture<'a, Vec<IndexHit>>;

    /// Exact number of items matching `filter`.
    fn count<'a>(&'a self, filter: Option<&'a StructuredFilter>) -> IndexFuture<'a, u64>;

    /// Up to `limit` payloads matching `filter`, starting at `cursor`.
    fn scroll<'a>(
        &'a self,
        filter: Option<&'a StructuredFilter>,
        limit: u32,
        cursor: Option<PointKey>,
    ) -> IndexFuture<'a, ScrollPage>;

    /// Point count and vector parameters of the collection.
    fn collection_info(&self) -> IndexFuture<'_, CollectionStatus>;
}
