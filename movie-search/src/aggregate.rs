//! Catalog analytics: genre cardinalities and mean vote per decade.

use std::collections::HashMap;

use tracing::info;

use crate::errors::MovieSearchError;
use crate::filters::{FilterClause, StructuredFilter};
use crate::index::VectorIndex;
use crate::record::{DecadeStat, GenreCount, MoviePayload, decade_of};
use crate::scan::scan;

/// Exact item count per genre, sorted by count descending.
///
/// Equal counts keep the input order. One failed count fails the whole call.
///
/// # Errors
/// Returns `IndexUnavailable` if any count request fails.
pub async fn counts_by_genre<S: AsRef<str>>(
    index: &dyn VectorIndex,
    genres: &[S],
) -> Result<Vec<GenreCount>, MovieSearchError> {
    let mut rows = Vec::with_capacity(genres.len());
    for g in genres {
        let genre = g.as_ref().to_string();
        let filter = StructuredFilter::from_clause(FilterClause::GenreAny(
            std::iter::once(genre.clone()).collect(),
        ));
        let count = index.count(Some(&filter)).await?;
        rows.push(GenreCount { genre, count });
    }

    // `sort_by` is stable: ties stay in input order.
    rows.sort_by(|a, b| b.count.cmp(&a.count));

    info!(
        target: "movie_search::analytics",
        genres = rows.len(),
        "counts_by_genre finished"
    );
    Ok(rows)
}

/// Mean `vote_average` for each decade start in `decades`, sorted ascending.
///
/// The catalog is scanned once (no structured filter) and bucketed locally.
/// An item belongs to decade `d` when its release year is in `[d, d + 9]`;
/// items without a parsable year or vote are skipped.
///
/// # Errors
/// Returns `ScanFailed` if the scan fails; no partial rows are produced.
pub async fn decade_mean_vote(
    index: &dyn VectorIndex,
    page_size: u32,
    decades: &[i32],
) -> Result<Vec<DecadeStat>, MovieSearchError> {
    if decades.is_empty() {
        return Ok(Vec::new());
    }

    let payloads = scan(index, None, page_size, None).await?;
    let rows = decade_stats(&payloads, decades);

    info!(
        target: "movie_search::analytics",
        scanned = payloads.len(),
        decades = rows.len(),
        "decade_mean_vote finished"
    );
    Ok(rows)
}

/// Local part of [`decade_mean_vote`]: bucket `payloads` by decade.
pub fn decade_stats(payloads: &[MoviePayload], decades: &[i32]) -> Vec<DecadeStat> {
    // (sum, n) per aligned decade start.
    let mut buckets: HashMap<i32, (f64, usize)> = HashMap::new();
    for p in payloads {
        let (Some(year), Some(vote)) = (p.release_year(), p.vote_average) else {
            continue;
        };
        let entry = buckets.entry(decade_of(year)).or_insert((0.0, 0));
        entry.0 += vote;
        entry.1 += 1;
    }

    let mut rows = decades
        .iter()
        .map(|&d| {
            let (sum, n) = if d.rem_euclid(10) == 0 {
                buckets.get(&d).copied().unwrap_or((0.0, 0))
            } else {
                // Unaligned start: the window spans two buckets, filter directly.
                window_sum(payloads, d)
            };
            DecadeStat {
                decade: d,
                mean_vote: if n > 0 { sum / n as f64 } else { f64::NAN },
                n,
            }
        })
        .collect::<Vec<_>>();

    rows.sort_by_key(|r| r.decade);
    rows
}

fn window_sum(payloads: &[MoviePayload], start: i32) -> (f64, usize) {
    payloads
        .iter()
        .filter(|p| {
            p.release_year()
                .is_some_and(|y| y >= start && y <= start.saturating_add(9))
        })
        .filter_map(|p| p.vote_average)
        .fold((0.0, 0), |(s, n), v| (s + v, n + 1))
}
