//! TMDB client: movie details by id, or title search as a fallback.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::cache::TtlCache;
use crate::config::PosterConfig;
use crate::error::PosterError;
use crate::{PosterLookup, PosterQuery};

/// Cached TMDB poster resolver.
pub struct TmdbPosterClient {
    client: reqwest::Client,
    cfg: PosterConfig,
    cache: TtlCache,
}

impl TmdbPosterClient {
    /// # Errors
    /// [`PosterError::Transport`] if the HTTP client cannot be built.
    pub fn new(cfg: PosterConfig) -> Result<Self, PosterError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        let cache = TtlCache::new(Duration::from_secs(cfg.cache_ttl_secs));
        Ok(Self { client, cfg, cache })
    }

    pub fn config(&self) -> &PosterConfig {
        &self.cfg
    }

    /// Uncached lookup.
    ///
    /// Any non-zero TMDB id selects `GET /movie/{id}` and nothing else; a movie
    /// without `poster_path` is not retried by title. Without an id (or with
    /// id 0), the first `GET /search/movie` result is used.
    ///
    /// # Errors
    /// Any [`PosterError`]; callers of [`PosterLookup`] only see `None`.
    #[instrument(skip_all, fields(tmdb_id = ?query.tmdb_id))]
    pub async fn fetch(&self, query: &PosterQuery) -> Result<String, PosterError> {
        let token = self.cfg.api_key.as_deref().ok_or(PosterError::NoToken)?;

        let poster_path = match (query.tmdb_id, query.title.as_deref()) {
            (Some(id), _) if id != 0 => {
                let url = format!("{}/movie/{id}", self.cfg.api_base);
                let details: MovieDetails = self.get_json(&url, token, &[]).await?;
                details.poster_path
            }
            (_, Some(title)) if !title.trim().is_empty() => {
                let url = format!("{}/search/movie", self.cfg.api_base);
                let found: SearchResults = self.get_json(&url, token, &[("query", title)]).await?;
                found.results.into_iter().next().and_then(|m| m.poster_path)
            }
            _ => return Err(PosterError::EmptyQuery),
        };

        match poster_path.filter(|p| !p.is_empty()) {
            Some(p) => Ok(format!("{}{p}", self.cfg.image_base)),
            None => Err(PosterError::NoPoster(describe(query))),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        token: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, PosterError> {
        debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("language", self.cfg.language.as_str())])
            .query(extra)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(PosterError::Status {
                status: resp.status(),
                url: url.to_string(),
            });
        }
        Ok(resp.json::<T>().await?)
    }
}

impl PosterLookup for TmdbPosterClient {
    fn poster_url<'a>(
        &'a self,
        query: &'a PosterQuery,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async move {
            if !self.cfg.enabled() {
                return None;
            }
            if let Some(hit) = self.cache.get(query).await {
                return hit;
            }

            let url = match self.fetch(query).await {
                Ok(u) => Some(u),
                Err(e @ (PosterError::NoPoster(_) | PosterError::EmptyQuery)) => {
                    debug!("poster lookup: {e}");
                    None
                }
                Err(e) => {
                    warn!("poster lookup failed for {}: {e}", describe(query));
                    None
                }
            };
            self.cache.put(query.clone(), url.clone()).await;
            url
        })
    }
}

fn describe(q: &PosterQuery) -> String {
    match (&q.tmdb_id, &q.title) {
        (Some(id), _) => format!("tmdb:{id}"),
        (None, Some(t)) => format!("'{t}'"),
        (None, None) => "<unknown>".into(),
    }
}

/* ==========================
TMDB payloads
========================== */

#[derive(Debug, Deserialize)]
struct MovieDetails {
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    results: Vec<MovieDetails>,
}
