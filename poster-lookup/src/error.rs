use thiserror::Error;

/// Reasons a poster lookup produced nothing.
///
/// Never returned by [`crate::PosterLookup`]; kept for logging and for
/// callers of the lower-level [`crate::TmdbPosterClient::fetch`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PosterError {
    /// No API token configured.
    #[error("TMDB_API_KEY is not set")]
    NoToken,

    /// Neither a usable id nor a title was given.
    #[error("query has neither tmdb id nor title")]
    EmptyQuery,

    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("TMDB returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The movie exists but has no `poster_path`.
    #[error("no poster for {0}")]
    NoPoster(String),
}
