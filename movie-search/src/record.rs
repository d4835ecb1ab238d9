//! Core data models used by the library.

use serde::Serialize;

use crate::config::DistanceKind;

/// Opaque point identifier as stored in the index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum PointKey {
    Num(u64),
    Uuid(String),
}

impl std::fmt::Display for PointKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointKey::Num(n) => write!(f, "{n}"),
            PointKey::Uuid(s) => f.write_str(s),
        }
    }
}

/// Movie payload with a fixed schema; every field that may be absent in the
/// collection is an explicit `Option`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MoviePayload {
    pub title: Option<String>,
    /// Genre names in stored order; empty when the item has none.
    pub genres: Vec<String>,
    /// Raw release date, `YYYY-MM-DD` or at least `YYYY...`; may be malformed.
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub popularity: Option<f64>,
    /// External TMDB identifier, used for poster lookups.
    pub tmdb_id: Option<i64>,
}

impl MoviePayload {
    /// Year from the four leading characters of `release_date`.
    ///
    /// `None` when the date is absent, shorter than four characters, or its
    /// prefix is not four ASCII digits.
    pub fn release_year(&self) -> Option<i32> {
        parse_year(self.release_date.as_deref()?)
    }

    /// `true` when the item carries at least one of `wanted`.
    pub fn has_any_genre<'a>(&self, mut wanted: impl Iterator<Item = &'a String>) -> bool {
        wanted.any(|w| self.genres.iter().any(|g| g == w))
    }
}

/// Parses the leading `YYYY` of a date string.
pub fn parse_year(date: &str) -> Option<i32> {
    let head = date.get(..4)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}

/// Decade start for a year, e.g. 1994 → 1990.
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Residual year constraint applied after retrieval.
///
/// Bounds are inclusive. Inverted bounds are kept as given and simply match nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct YearRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl YearRange {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        Self { min, max }
    }

    /// No bound set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Strict policy: with any bound active, a missing year never matches.
    pub fn contains(&self, year: Option<i32>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(y) = year else {
            return false;
        };
        self.min.is_none_or(|min| y >= min) && self.max.is_none_or(|max| y <= max)
    }
}

/// Query parameters for semantic retrieval.
#[derive(Clone, Debug)]
pub struct SearchQuery<'a> {
    pub text: &'a str,
    pub top_k: u64,
    /// Selected genres (OR semantics); empty means no genre constraint.
    pub genres: Vec<String>,
    pub years: YearRange,
}

impl<'a> SearchQuery<'a> {
    /// Unfiltered query.
    pub fn new(text: &'a str, top_k: u64) -> Self {
        Self {
            text,
            top_k,
            genres: Vec::new(),
            years: YearRange::default(),
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_years(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.years = YearRange::new(min, max);
        self
    }
}

/// A single ranked retrieval hit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredHit {
    pub id: Option<PointKey>,
    pub payload: MoviePayload,
    pub score: f32,
    /// 1-based position after all filtering.
    pub rank: usize,
}

/// Number of catalog items carrying a genre.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: u64,
}

/// Mean vote of the items released in `[decade, decade + 9]`.
#[derive(Clone, Debug, Serialize)]
pub struct DecadeStat {
    pub decade: i32,
    /// NaN when no item in the decade carries a vote.
    pub mean_vote: f64,
    /// Number of votes that contributed to `mean_vote`.
    pub n: usize,
}

impl DecadeStat {
    /// `Some(mean)` when at least one vote contributed.
    pub fn mean(&self) -> Option<f64> {
        (self.n > 0).then_some(self.mean_vote)
    }
}

/// Collection-level facts reported by the index.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollectionStatus {
    pub points_count: u64,
    /// Vector size of the (single, unnamed) vector space, if reported.
    pub vector_size: Option<u64>,
    #[serde(skip)]
    pub distance: Option<DistanceKind>,
}
