//! Poster URLs for catalog items, looked up on TMDB.
//!
//! Lookups are best effort: any failure yields `None` and is only logged.
//! Answers (including `None`) are cached for a configurable TTL.

mod cache;
mod config;
mod error;
mod tmdb;

pub use config::PosterConfig;
pub use error::PosterError;
pub use tmdb::TmdbPosterClient;

use std::{future::Future, pin::Pin};

/// What is known about the movie whose poster is wanted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PosterQuery {
    /// TMDB movie id; takes precedence over the title.
    pub tmdb_id: Option<i64>,
    pub title: Option<String>,
}

impl PosterQuery {
    pub fn new(tmdb_id: Option<i64>, title: Option<String>) -> Self {
        Self { tmdb_id, title }
    }
}

/// Resolves a poster image URL for a movie.
pub trait PosterLookup: Send + Sync {
    /// `None` when no poster is known or the lookup failed.
    fn poster_url<'a>(
        &'a self,
        query: &'a PosterQuery,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;
}
