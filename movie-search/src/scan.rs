//! Catalog scanning: complete, cursor-paginated enumeration of payloads.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::errors::MovieSearchError;
use crate::filters::StructuredFilter;
use crate::index::VectorIndex;
use crate::record::MoviePayload;

/// Enumerates payloads matching `filter` in the index's scan order.
///
/// Pages of up to `page_size` items are requested until a page comes back
/// empty, the index reports no further cursor, or `limit_total` items have
/// been collected (the last page is truncated so exactly `limit_total` are
/// returned).
///
/// # Errors
/// - `InvalidArgument` if `page_size == 0`
/// - `ScanFailed` if any page request fails; pages already fetched are dropped
pub async fn scan(
    index: &dyn VectorIndex,
    filter: Option<&StructuredFilter>,
    page_size: u32,
    limit_total: Option<usize>,
) -> Result<Vec<MoviePayload>, MovieSearchError> {
    if page_size == 0 {
        return Err(MovieSearchError::InvalidArgument(
            "page_size must be >= 1".into(),
        ));
    }

    let mut out: Vec<MoviePayload> = Vec::new();
    if limit_total == Some(0) {
        return Ok(out);
    }

    let mut cursor = None;
    let mut pages = 0usize;

    loop {
        let page = match index.scroll(filter, page_size, cursor.take()).await {
            Ok(p) => p,
            Err(e) => {
                warn!(
                    target: "movie_search::scan",
                    pages,
                    discarded = out.len(),
                    error = %e,
                    "scan aborted"
                );
                return Err(MovieSearchError::ScanFailed {
                    pages_fetched: pages,
                    reason: e.to_string(),
                });
            }
        };
        pages += 1;

        if page.points.is_empty() {
            break;
        }
        out.extend(page.points);

        if let Some(limit) = limit_total {
            if out.len() >= limit {
                out.truncate(limit);
                break;
            }
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
        debug!("scan: page={} accumulated={}", pages, out.len());
    }

    info!(
        target: "movie_search::scan",
        pages,
        items = out.len(),
        filtered = filter.is_some(),
        "scan finished"
    );
    Ok(out)
}

/// Sorted, de-duplicated genre names found in the first `sample` payloads.
///
/// # Errors
/// Propagates `ScanFailed` / `InvalidArgument` from [`scan`].
pub async fn list_known_genres(
    index: &dyn VectorIndex,
    page_size: u32,
    sample: usize,
) -> Result<Vec<String>, MovieSearchError> {
    let payloads = scan(index, None, page_size, Some(sample)).await?;
    Ok(distinct_genres(&payloads))
}

/// Sorted union of all non-empty genre names.
pub fn distinct_genres(payloads: &[MoviePayload]) -> Vec<String> {
    payloads
        .iter()
        .flat_map(|p| p.genres.iter())
        .filter(|g| !g.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
