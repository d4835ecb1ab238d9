//! Retrieval: embed → pre-filtered vector search → residual year filter → ranks.

use tracing::{debug, info, trace};

use crate::config::CatalogConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::MovieSearchError;
use crate::filters::build_genre_filter;
use crate::index::{IndexHit, VectorIndex};
use crate::record::{ScoredHit, SearchQuery, YearRange};

/// Runs a semantic search for `query`.
///
/// The genre selection is pushed into the index as a pre-filter and exactly
/// `top_k` candidates are requested. The year range is applied afterwards and
/// drops candidates without backfilling, so the result may hold fewer than
/// `top_k` hits. Order is the index's similarity order; ranks are 1-based.
///
/// # Errors
/// - `InvalidArgument` if `top_k == 0`
/// - `EmbeddingUnavailable` / `VectorSizeMismatch` from the embedding step
/// - `IndexUnavailable` if the index search fails
pub async fn search(
    cfg: &CatalogConfig,
    index: &dyn VectorIndex,
    provider: &dyn EmbeddingsProvider,
    query: &SearchQuery<'_>,
) -> Result<Vec<ScoredHit>, MovieSearchError> {
    trace!(
        "retrieve::search top_k={} genres={} years={:?}",
        query.top_k,
        query.genres.len(),
        query.years
    );
    if query.top_k == 0 {
        return Err(MovieSearchError::InvalidArgument("top_k must be >= 1".into()));
    }

    let qv = provider.embed(query.text).await?;
    if qv.len() != cfg.embedding_dim {
        return Err(MovieSearchError::VectorSizeMismatch {
            got: qv.len(),
            want: cfg.embedding_dim,
        });
    }

    let filter = build_genre_filter(query.genres.as_slice());
    let candidates = index.search(qv, query.top_k, filter.as_ref()).await?;
    let fetched = candidates.len();

    let hits = rank_hits(candidates, query.years, query.top_k);

    info!(
        target: "movie_search::search",
        top_k = query.top_k,
        fetched,
        returned = hits.len(),
        "search finished"
    );
    Ok(hits)
}

/// Applies the residual year filter, caps at `top_k`, and assigns ranks.
///
/// Input order is preserved.
pub fn rank_hits(candidates: Vec<IndexHit>, years: YearRange, top_k: u64) -> Vec<ScoredHit> {
    let cap = usize::try_from(top_k).unwrap_or(usize::MAX);

    let kept = candidates
        .into_iter()
        .filter(|h| years.contains(h.payload.release_year()))
        .take(cap)
        .enumerate()
        .map(|(i, h)| ScoredHit {
            id: h.id,
            payload: h.payload,
            score: h.score,
            rank: i + 1,
        })
        .collect::<Vec<_>>();

    debug!("retrieve::rank_hits kept={}", kept.len());
    kept
}
