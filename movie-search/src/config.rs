//! Runtime and collection configuration.

use crate::errors::MovieSearchError;

/// Distance function of the collection's vector space.
///
/// Informational: the index is external and already built; retrieval assumes
/// normalized vectors so Cosine and Dot rank identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine similarity (default).
    Cosine,
    /// Dot product.
    Dot,
}

impl DistanceKind {
    /// Parse from env string (case-insensitive). Defaults to Cosine.
    pub fn from_env(s: Option<String>) -> Self {
        match s
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "dot" | "dotproduct" => DistanceKind::Dot,
            _ => DistanceKind::Cosine,
        }
    }
}

/// Configuration for retrieval and analytics over the movie collection.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    /// Qdrant endpoint, e.g. `https://xyz.cloud.qdrant.io:6334`.
    pub qdrant_url: String,
    /// API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Client-side timeout for Qdrant calls, seconds.
    pub timeout_secs: u64,
    /// Expected embedding dimensionality (all-MiniLM-L6-v2 → 384).
    pub embedding_dim: usize,
    /// Distance function of the collection.
    pub distance: DistanceKind,
    /// Page size for cursor scans.
    pub scan_page_size: u32,
    /// How many payloads to sample when listing known genres.
    pub genre_sample: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl CatalogConfig {
    /// Creates a sane default config for a given endpoint and collection.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            timeout_secs: 30,
            embedding_dim: 384,
            distance: DistanceKind::Cosine,
            scan_page_size: 2000,
            genre_sample: 8000,
            exact_search: false,
        }
    }

    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `QDRANT_URL` (required)
    /// - `QDRANT_API_KEY` (required)
    /// - `COLLECTION_NAME` (default: "tmdb_movies")
    /// - `QDRANT_TIMEOUT_SECS` (default: 30)
    /// - `QDRANT_DISTANCE` ("Cosine" | "Dot"; default: "Cosine")
    /// - `EMBEDDING_DIM` (default: 384)
    /// - `SCAN_PAGE_SIZE` (default: 2000)
    /// - `GENRE_SAMPLE` (default: 8000)
    /// - `EXACT_SEARCH` (default: false)
    pub fn from_env() -> Result<Self, MovieSearchError> {
        let qdrant_url = read_required_env("QDRANT_URL")?;
        let qdrant_api_key = Some(read_required_env("QDRANT_API_KEY")?);
        let collection = std::env::var("COLLECTION_NAME")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "tmdb_movies".into());

        let cfg = Self {
            qdrant_url,
            qdrant_api_key,
            collection,
            timeout_secs: read_env_or("QDRANT_TIMEOUT_SECS", 30)?,
            embedding_dim: read_env_or("EMBEDDING_DIM", 384)?,
            distance: DistanceKind::from_env(std::env::var("QDRANT_DISTANCE").ok()),
            scan_page_size: read_env_or("SCAN_PAGE_SIZE", 2000)?,
            genre_sample: read_env_or("GENRE_SAMPLE", 8000)?,
            exact_search: read_env_or("EXACT_SEARCH", false)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), MovieSearchError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(MovieSearchError::Configuration("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(MovieSearchError::Configuration("collection is empty".into()));
        }
        if self.embedding_dim == 0 {
            return Err(MovieSearchError::Configuration(
                "EMBEDDING_DIM must be > 0".into(),
            ));
        }
        if self.scan_page_size == 0 {
            return Err(MovieSearchError::Configuration(
                "SCAN_PAGE_SIZE must be > 0".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(MovieSearchError::Configuration(
                "QDRANT_TIMEOUT_SECS must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Read a required, non-empty variable.
fn read_required_env(key: &str) -> Result<String, MovieSearchError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(MovieSearchError::EnvMissing { key: key.into() }),
    }
}

/// Read an optional variable, falling back to `default` when unset or empty.
fn read_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, MovieSearchError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            v.trim().parse::<T>().map_err(|_| MovieSearchError::EnvParse {
                key: key.into(),
                value: v,
            })
        }
        _ => Ok(default),
    }
}
