//! In-memory test doubles for the index and the embedding provider.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use movie_search::{
    CollectionStatus, DistanceKind, EmbeddingsProvider, IndexFuture, IndexHit, MoviePayload,
    MovieSearchError, PointKey, ScrollPage, StructuredFilter, VectorIndex, filter_matches,
};

pub const DIM: usize = 4;

/// One stored point.
#[derive(Clone, Debug)]
pub struct Item {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: MoviePayload,
}

pub fn movie(genres: &[&str], date: Option<&str>, vote: Option<f64>) -> MoviePayload {
    MoviePayload {
        title: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        release_date: date.map(str::to_string),
        vote_average: vote,
        popularity: None,
        tmdb_id: None,
    }
}

pub fn unit(axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[axis] = 1.0;
    v
}

/// Brute-force index ranking by dot product; ties keep insertion order.
///
/// Scroll cursors are positions in the insertion order. Failure switches
/// make the corresponding call return `IndexUnavailable`.
#[derive(Default)]
pub struct MemoryIndex {
    items: Vec<Item>,
    pub vector_size: Option<u64>,
    pub fail_search: AtomicBool,
    pub fail_count: AtomicBool,
    pub fail_info: AtomicBool,
    /// Scroll fails once this many pages have been served.
    pub fail_scroll_after: Mutex<Option<usize>>,
    pub scroll_calls: AtomicUsize,
    pub count_calls: AtomicUsize,
}

impl MemoryIndex {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            vector_size: Some(DIM as u64),
            ..Default::default()
        }
    }

    /// Items with identical vectors built from payloads only.
    pub fn from_payloads(payloads: Vec<MoviePayload>) -> Self {
        Self::new(
            payloads
                .into_iter()
                .enumerate()
                .map(|(i, payload)| Item {
                    id: i as u64 + 1,
                    vector: unit(0),
                    payload,
                })
                .collect(),
        )
    }

    pub fn scrolls(&self) -> usize {
        self.scroll_calls.load(Ordering::SeqCst)
    }

    fn down(what: &str) -> MovieSearchError {
        MovieSearchError::IndexUnavailable(format!("{what}: injected failure"))
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl VectorIndex for MemoryIndex {
    fn search<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<&'a StructuredFilter>,
    ) -> IndexFuture<'a, Vec<IndexHit>> {
        Box::pin(async move {
            if self.fail_search.load(Ordering::SeqCst) {
                return Err(Self::down("search"));
            }
            let mut hits: Vec<IndexHit> = self
                .items
                .iter()
                .filter(|it| filter_matches(filter, &it.payload))
                .map(|it| IndexHit {
                    id: Some(PointKey::Num(it.id)),
                    score: dot(&vector, &it.vector),
                    payload: it.payload.clone(),
                })
                .collect();
            hits.sort_by(|a, b| b.score.total_cmp(&a.score));
            hits.truncate(top_k as usize);
            Ok(hits)
        })
    }

    fn count<'a>(&'a self, filter: Option<&'a StructuredFilter>) -> IndexFuture<'a, u64> {
        Box::pin(async move {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_count.load(Ordering::SeqCst) {
                return Err(Self::down("count"));
            }
            Ok(self
                .items
                .iter()
                .filter(|it| filter_matches(filter, &it.payload))
                .count() as u64)
        })
    }

    fn scroll<'a>(
        &'a self,
        filter: Option<&'a StructuredFilter>,
        limit: u32,
        cursor: Option<PointKey>,
    ) -> IndexFuture<'a, ScrollPage> {
        Box::pin(async move {
            let served = self.scroll_calls.fetch_add(1, Ordering::SeqCst);
            let fail_after = *self.fail_scroll_after.lock().expect("lock");
            if fail_after.is_some_and(|n| served >= n) {
                return Err(Self::down("scroll"));
            }

            let start = match cursor {
                None => 0,
                Some(PointKey::Num(n)) => n as usize,
                Some(PointKey::Uuid(_)) => return Err(Self::down("scroll cursor")),
            };
            let matching: Vec<&Item> = self
                .items
                .iter()
                .filter(|it| filter_matches(filter, &it.payload))
                .collect();

            let end = (start + limit as usize).min(matching.len());
            let points = matching
                .get(start..end)
                .unwrap_or_default()
                .iter()
                .map(|it| it.payload.clone())
                .collect();
            let next_cursor = (end < matching.len()).then_some(PointKey::Num(end as u64));
            Ok(ScrollPage {
                points,
                next_cursor,
            })
        })
    }

    fn collection_info(&self) -> IndexFuture<'_, CollectionStatus> {
        Box::pin(async move {
            if self.fail_info.load(Ordering::SeqCst) {
                return Err(Self::down("collection_info"));
            }
            Ok(CollectionStatus {
                points_count: self.items.len() as u64,
                vector_size: self.vector_size,
                distance: Some(DistanceKind::Cosine),
            })
        })
    }
}

/// Returns the same vector for every text.
pub struct FixedEmbedder(pub Vec<f32>);

impl EmbeddingsProvider for FixedEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<f32>, MovieSearchError>> + Send + 'a>,
    > {
        Box::pin(async move { Ok(self.0.clone()) })
    }
}

/// Always unavailable.
pub struct DownEmbedder;

impl EmbeddingsProvider for DownEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Vec<f32>, MovieSearchError>> + Send + 'a>,
    > {
        Box::pin(async {
            Err::<Vec<f32>, _>(MovieSearchError::EmbeddingUnavailable(
                "connection refused".into(),
            ))
        })
    }
}
