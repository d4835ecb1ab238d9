use std::env;

/// TMDB access settings.
#[derive(Clone, Debug)]
pub struct PosterConfig {
    /// Bearer token (TMDB API read access token). `None` disables lookups.
    pub api_key: Option<String>,
    /// `language` query parameter, e.g. `fr-FR`.
    pub language: String,
    /// API base, without trailing slash.
    pub api_base: String,
    /// Prefix joined with `poster_path`.
    pub image_base: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: "fr-FR".into(),
            api_base: "https://api.themoviedb.org/3".into(),
            image_base: "https://image.tmdb.org/t/p/w342".into(),
            timeout_secs: 6,
            cache_ttl_secs: 3600,
        }
    }
}

impl PosterConfig {
    /// Reads `TMDB_API_KEY`, `TMDB_LANGUAGE`, `TMDB_API_BASE` and
    /// `POSTER_CACHE_TTL_SECS`; everything is optional.
    ///
    /// An unparsable TTL falls back to the default.
    pub fn from_env() -> Self {
        let d = Self::default();
        let non_empty = |k: &str| {
            env::var(k)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            api_key: non_empty("TMDB_API_KEY"),
            language: non_empty("TMDB_LANGUAGE").unwrap_or(d.language),
            api_base: non_empty("TMDB_API_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or(d.api_base),
            image_base: d.image_base,
            timeout_secs: d.timeout_secs,
            cache_ttl_secs: non_empty("POSTER_CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.cache_ttl_secs),
        }
    }

    pub fn enabled(&self) -> bool {
        self.api_key.is_some()
    }
}
