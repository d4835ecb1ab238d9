mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use common::{DIM, DownEmbedder, FixedEmbedder, Item, MemoryIndex, movie, unit};
use movie_search::{
    CatalogConfig, MovieCatalog, MovieSearchError, PointKey, SearchQuery, build_genre_filter,
};

fn cfg() -> CatalogConfig {
    let mut cfg = CatalogConfig::new_default("http://localhost:6334", "tmdb_movies");
    cfg.embedding_dim = DIM;
    cfg.scan_page_size = 2;
    cfg
}

fn catalog(index: MemoryIndex) -> (MovieCatalog, Arc<MemoryIndex>) {
    let index = Arc::new(index);
    let cat = MovieCatalog::new(cfg(), index.clone(), Arc::new(FixedEmbedder(unit(0))));
    (cat, index)
}

/// Items whose similarity to `unit(0)` decreases with the id.
fn graded(payloads: Vec<movie_search::MoviePayload>) -> MemoryIndex {
    let n = payloads.len();
    MemoryIndex::new(
        payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| {
                let w = 1.0 - i as f32 / (n as f32 + 1.0);
                Item {
                    id: i as u64 + 1,
                    vector: vec![w, 1.0 - w, 0.0, 0.0],
                    payload,
                }
            })
            .collect(),
    )
}

fn ids(hits: &[movie_search::ScoredHit]) -> Vec<u64> {
    hits.iter()
        .filter_map(|h| match h.id {
            Some(PointKey::Num(n)) => Some(n),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn end_to_end_genre_and_year() {
    let (cat, _) = catalog(graded(vec![
        movie(&["Sci-Fi"], Some("2001-01-01"), Some(7.5)),
        movie(&["Drama"], Some("1999-01-01"), Some(6.0)),
        movie(&["Sci-Fi"], Some("2010-01-01"), Some(8.0)),
    ]));

    let q = SearchQuery::new("space opera", 10)
        .with_genres(["Sci-Fi"])
        .with_years(Some(2000), None);
    let hits = cat.search(&q).await.expect("search");

    assert_eq!(ids(&hits), vec![1, 3]);
    assert_eq!(hits[0].rank, 1);
    assert_eq!(hits[1].rank, 2);
    assert!(hits[0].score >= hits[1].score);
}

#[tokio::test]
async fn results_are_bounded_sorted_and_idempotent() {
    let payloads = (0..12)
        .map(|i| movie(&["Action"], Some(&format!("{}-01-01", 1990 + i)), None))
        .collect();
    let (cat, _) = catalog(graded(payloads));

    let q = SearchQuery::new("anything", 5);
    let first = cat.search(&q).await.expect("search");
    let second = cat.search(&q).await.expect("search");

    assert_eq!(first.len(), 5);
    assert!(first.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(first, second);
}

#[tokio::test]
async fn year_filter_does_not_backfill() {
    let (cat, _) = catalog(graded(vec![
        movie(&[], Some("2012-05-01"), None),
        movie(&[], None, None),
        movie(&[], Some("n/a"), None),
        movie(&[], Some("2014-01-01"), None),
    ]));

    let q = SearchQuery::new("q", 3).with_years(Some(2010), Some(2015));
    let hits = cat.search(&q).await.expect("search");
    // Only the first three candidates are fetched; two lack a usable year.
    assert_eq!(ids(&hits), vec![1]);
}

#[tokio::test]
async fn genre_selection_is_or() {
    let (cat, _) = catalog(graded(vec![
        movie(&["Action"], None, None),
        movie(&["Comedy"], None, None),
        movie(&["Drama", "Romance"], None, None),
    ]));

    let q = SearchQuery::new("q", 10).with_genres(["Action", "Drama"]);
    assert_eq!(ids(&cat.search(&q).await.expect("search")), vec![1, 3]);

    let all = SearchQuery::new("q", 10).with_genres(Vec::<String>::new());
    assert_eq!(cat.search(&all).await.expect("search").len(), 3);
}

#[tokio::test]
async fn blank_genre_selection_matches_nothing() {
    let (cat, _) = catalog(graded(vec![
        movie(&["Action"], None, None),
        movie(&["Drama"], None, None),
    ]));

    let q = SearchQuery::new("q", 10).with_genres(["  "]);
    assert!(cat.search(&q).await.expect("search").is_empty());

    let padded = SearchQuery::new("q", 10).with_genres([" Action"]);
    assert!(cat.search(&padded).await.expect("search").is_empty());
}

#[tokio::test]
async fn zero_top_k_is_rejected() {
    let (cat, _) = catalog(MemoryIndex::from_payloads(vec![movie(&[], None, None)]));
    let err = cat.search(&SearchQuery::new("q", 0)).await.expect_err("must fail");
    assert!(matches!(err, MovieSearchError::InvalidArgument(_)));
}

#[tokio::test]
async fn search_surfaces_collaborator_failures() {
    let index = Arc::new(MemoryIndex::from_payloads(vec![movie(&[], None, None)]));
    let down = MovieCatalog::new(cfg(), index.clone(), Arc::new(DownEmbedder));
    let err = down.search(&SearchQuery::new("q", 3)).await.expect_err("must fail");
    assert!(matches!(err, MovieSearchError::EmbeddingUnavailable(_)));

    let short = MovieCatalog::new(cfg(), index.clone(), Arc::new(FixedEmbedder(vec![1.0])));
    let err = short.search(&SearchQuery::new("q", 3)).await.expect_err("must fail");
    assert!(matches!(err, MovieSearchError::VectorSizeMismatch { got: 1, want: DIM }));

    index.fail_search.store(true, Ordering::SeqCst);
    let cat = MovieCatalog::new(cfg(), index, Arc::new(FixedEmbedder(unit(0))));
    let err = cat.search(&SearchQuery::new("q", 3)).await.expect_err("must fail");
    assert!(matches!(err, MovieSearchError::IndexUnavailable(_)));
}

#[tokio::test]
async fn scan_respects_limit_and_terminates() {
    let payloads = (0..5).map(|_| movie(&["Drama"], None, None)).collect();
    let (cat, index) = catalog(MemoryIndex::from_payloads(payloads));

    assert_eq!(cat.scan(None, None).await.expect("scan").len(), 5);
    assert_eq!(cat.scan(None, Some(3)).await.expect("scan").len(), 3);
    assert_eq!(cat.scan(None, Some(50)).await.expect("scan").len(), 5);

    let before = index.scrolls();
    assert!(cat.scan(None, Some(0)).await.expect("scan").is_empty());
    assert_eq!(index.scrolls(), before);
}

#[tokio::test]
async fn empty_catalog_scan_stops_after_one_page() {
    let (cat, index) = catalog(MemoryIndex::from_payloads(vec![]));
    assert!(cat.scan(None, None).await.expect("scan").is_empty());
    assert_eq!(index.scrolls(), 1);
}

#[tokio::test]
async fn scan_applies_structured_filter() {
    let (cat, _) = catalog(MemoryIndex::from_payloads(vec![
        movie(&["Drama"], None, None),
        movie(&["Action"], None, None),
        movie(&["Drama"], None, None),
    ]));
    let f = build_genre_filter(&["Drama"]);
    let got = cat.scan(f.as_ref(), None).await.expect("scan");
    assert_eq!(got.len(), 2);
    assert!(got.iter().all(|p| p.genres == vec!["Drama".to_string()]));
}

#[tokio::test]
async fn scan_failure_discards_partial_pages() {
    let payloads = (0..5).map(|_| movie(&[], None, None)).collect();
    let (cat, index) = catalog(MemoryIndex::from_payloads(payloads));
    *index.fail_scroll_after.lock().expect("lock") = Some(1);

    let err = cat.scan(None, None).await.expect_err("must fail");
    match err {
        MovieSearchError::ScanFailed { pages_fetched, .. } => assert_eq!(pages_fetched, 1),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn zero_page_size_is_invalid() {
    let index = Arc::new(MemoryIndex::from_payloads(vec![]));
    let mut bad = cfg();
    bad.scan_page_size = 0;
    let cat = MovieCatalog::new(bad, index, Arc::new(FixedEmbedder(unit(0))));
    let err = cat.scan(None, None).await.expect_err("must fail");
    assert!(matches!(err, MovieSearchError::InvalidArgument(_)));
}

#[tokio::test]
async fn known_genres_from_sample() {
    let (cat, _) = catalog(MemoryIndex::from_payloads(vec![
        movie(&["Western"], None, None),
        movie(&["Action", "Drama"], None, None),
        movie(&["Horror"], None, None),
    ]));
    assert_eq!(
        cat.list_known_genres(Some(2)).await.expect("genres"),
        vec!["Action", "Drama", "Western"]
    );
    assert_eq!(cat.list_known_genres(None).await.expect("genres").len(), 4);
}

#[tokio::test]
async fn genre_counts_descending() {
    let mut payloads = Vec::new();
    payloads.extend((0..80).map(|_| movie(&["Drama"], None, None)));
    payloads.extend((0..120).map(|_| movie(&["Action"], None, None)));
    let (cat, _) = catalog(MemoryIndex::from_payloads(payloads));

    let rows = cat.counts_by_genre(&["Drama", "Action"]).await.expect("counts");
    let got: Vec<(&str, u64)> = rows.iter().map(|r| (r.genre.as_str(), r.count)).collect();
    assert_eq!(got, vec![("Action", 120), ("Drama", 80)]);
}

#[tokio::test]
async fn genre_count_ties_keep_input_order() {
    let (cat, _) = catalog(MemoryIndex::from_payloads(vec![
        movie(&["Drama"], None, None),
        movie(&["Comedy"], None, None),
        movie(&["Comedy"], None, None),
        movie(&["Action"], None, None),
    ]));

    let rows = cat
        .counts_by_genre(&["Drama", "Comedy", "Action"])
        .await
        .expect("counts");
    let got: Vec<(&str, u64)> = rows.iter().map(|r| (r.genre.as_str(), r.count)).collect();
    assert_eq!(got, vec![("Comedy", 2), ("Drama", 1), ("Action", 1)]);
}

#[tokio::test]
async fn genre_counts_fail_as_a_whole() {
    let (cat, index) = catalog(MemoryIndex::from_payloads(vec![movie(&["Drama"], None, None)]));
    index.fail_count.store(true, Ordering::SeqCst);
    let err = cat.counts_by_genre(&["Drama", "Action"]).await.expect_err("must fail");
    assert!(matches!(err, MovieSearchError::IndexUnavailable(_)));
}

#[tokio::test]
async fn decade_means_and_empty_decades() {
    let (cat, _) = catalog(MemoryIndex::from_payloads(vec![
        movie(&[], Some("1994-01-01"), Some(7.0)),
        movie(&[], Some("1998-01-01"), Some(8.0)),
        movie(&[], Some("2005-01-01"), Some(0.0)),
        movie(&[], Some("bad"), Some(9.0)),
        movie(&[], Some("2006-01-01"), None),
    ]));

    let rows = cat.decade_mean_vote(&[2000, 1980, 1990]).await.expect("decades");
    assert_eq!(rows.iter().map(|r| r.decade).collect::<Vec<_>>(), vec![1980, 1990, 2000]);
    assert_eq!(rows[0].n, 0);
    assert!(rows[0].mean_vote.is_nan());
    assert_eq!(rows[1].n, 2);
    assert!((rows[1].mean_vote - 7.5).abs() < 1e-9);
    assert_eq!(rows[2].n, 1);
    assert_eq!(rows[2].mean(), Some(0.0));
}

#[tokio::test]
async fn no_decades_means_no_scan() {
    let (cat, index) = catalog(MemoryIndex::from_payloads(vec![movie(&[], None, None)]));
    assert!(cat.decade_mean_vote(&[]).await.expect("decades").is_empty());
    assert_eq!(index.scrolls(), 0);
}

#[tokio::test]
async fn connect_checks_the_collection() {
    let ok = MovieCatalog::connect(
        cfg(),
        Arc::new(MemoryIndex::from_payloads(vec![])),
        Arc::new(FixedEmbedder(unit(0))),
    )
    .await;
    assert!(ok.is_ok());

    let mut wide = MemoryIndex::from_payloads(vec![]);
    wide.vector_size = Some(384);
    let err = MovieCatalog::connect(cfg(), Arc::new(wide), Arc::new(FixedEmbedder(unit(0))))
        .await
        .err()
        .expect("must fail");
    assert!(matches!(err, MovieSearchError::VectorSizeMismatch { got: DIM, want: 384 }));
    assert!(err.is_fatal());

    let down = MemoryIndex::from_payloads(vec![]);
    down.fail_info.store(true, Ordering::SeqCst);
    let err = MovieCatalog::connect(cfg(), Arc::new(down), Arc::new(FixedEmbedder(unit(0))))
        .await
        .err()
        .expect("must fail");
    assert!(matches!(err, MovieSearchError::IndexUnavailable(_)));
}

#[tokio::test]
async fn status_reports_points() {
    let (cat, _) = catalog(MemoryIndex::from_payloads(vec![movie(&[], None, None); 3]));
    let st = cat.status().await.expect("status");
    assert_eq!(st.points_count, 3);
    assert_eq!(st.vector_size, Some(DIM as u64));
}
