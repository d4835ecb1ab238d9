//! Structured pre-filters and their conversion to Qdrant `Filter`.
//!
//! A [`StructuredFilter`] is a conjunction of clauses the index can evaluate
//! natively. Only genre membership is indexed; the year range stays a residual
//! predicate ([`crate::YearRange`]) applied after retrieval.

use std::collections::BTreeSet;

use qdrant_client::qdrant::{
    Condition, FieldCondition, Filter, Match, condition::ConditionOneOf, r#match::MatchValue,
};
use tracing::debug;

use crate::record::MoviePayload;

/// Payload key holding the genre list.
pub const GENRES_FIELD: &str = "genres";

/// One indexable clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterClause {
    /// True when the item's genres intersect the set (never empty).
    GenreAny(BTreeSet<String>),
}

impl FilterClause {
    pub fn matches(&self, payload: &MoviePayload) -> bool {
        match self {
            FilterClause::GenreAny(set) => payload.has_any_genre(set.iter()),
        }
    }
}

/// Conjunction of clauses; value object compared structurally.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructuredFilter {
    must: Vec<FilterClause>,
}

impl StructuredFilter {
    /// Filter with a single clause.
    pub fn from_clause(clause: FilterClause) -> Self {
        Self { must: vec![clause] }
    }

    /// `AND` composition.
    pub fn and(mut self, other: StructuredFilter) -> Self {
        self.must.extend(other.must);
        self
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.must
    }

    /// Local evaluation, same semantics as the index-side filter.
    pub fn matches(&self, payload: &MoviePayload) -> bool {
        self.must.iter().all(|c| c.matches(payload))
    }
}

/// Builds the genre pre-filter.
///
/// Returns `None` ("match everything") for an empty selection; otherwise a
/// single `GenreAny` clause (an item matches when it has **any** selected genre).
/// Names are matched verbatim, blanks included; duplicates collapse.
pub fn build_genre_filter<S: AsRef<str>>(genres: &[S]) -> Option<StructuredFilter> {
    if genres.is_empty() {
        return None;
    }
    let set: BTreeSet<String> = genres.iter().map(|g| g.as_ref().to_string()).collect();
    Some(StructuredFilter::from_clause(FilterClause::GenreAny(set)))
}

/// `true` when `filter` is absent or matches.
pub fn filter_matches(filter: Option<&StructuredFilter>, payload: &MoviePayload) -> bool {
    filter.is_none_or(|f| f.matches(payload))
}

/// Converts [`StructuredFilter`] to Qdrant [`Filter`].
///
/// Each clause becomes a nested filter (`GenreAny` → `should` over keyword
/// matches on `genres`); clauses are joined with `must`.
pub fn to_qdrant_filter(f: &StructuredFilter) -> Filter {
    debug!("filters::to_qdrant_filter clauses={}", f.must.len());

    let must = f
        .must
        .iter()
        .map(|clause| match clause {
            FilterClause::GenreAny(set) => Condition {
                condition_one_of: Some(ConditionOneOf::Filter(Filter {
                    should: set
                        .iter()
                        .map(|g| keyword_condition(GENRES_FIELD, g))
                        .collect(),
                    ..Default::default()
                })),
            },
        })
        .collect();

    Filter {
        must,
        ..Default::default()
    }
}

fn keyword_condition(key: &str, value: &str) -> Condition {
    Condition {
        condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
            key: key.to_string(),
            r#match: Some(Match {
                match_value: Some(MatchValue::Keyword(value.to_string())),
            }),
            ..Default::default()
        })),
    }
}
