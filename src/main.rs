mod cli;

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use colored::Colorize;
use embedding_service::{EmbeddingModelConfig, HealthService, OllamaService, telemetry};
use movie_search::{
    CatalogConfig, DecadeStat, GenreCount, MovieCatalog, OllamaEmbedder, QdrantIndex, ScoredHit,
    SearchQuery,
};
use poster_lookup::{PosterConfig, PosterLookup, PosterQuery, TmdbPosterClient};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};

/// How many genres `genre-counts` shows when none are given.
const DEFAULT_GENRE_COUNTS: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the variables may come from the environment.
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,movie_search=info"))
        .context("invalid log filter")?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter::filter_fn(|m| {
                    !m.target().starts_with(telemetry::TARGET_PREFIX)
                })),
        )
        .with(telemetry::layer())
        .init();

    let cli = Cli::parse();
    let catalog = connect().await?;

    run(&cli, &catalog).await
}

/// Startup: configuration, embedding health probe, and collection check.
/// Every failure here stops the process before a command runs.
async fn connect() -> anyhow::Result<MovieCatalog> {
    let cfg = CatalogConfig::from_env().context("catalog configuration")?;
    let emb_cfg = EmbeddingModelConfig::from_env().context("embedding configuration")?;

    let health = HealthService::new(Some(emb_cfg.timeout_secs))?
        .check(&emb_cfg)
        .await;
    if !health.ok {
        bail!(
            "embedding backend unavailable at {}: {}",
            health.endpoint,
            health.message
        );
    }
    info!(
        "Embedding backend ok: model={} latency={}ms",
        health.model, health.latency_ms
    );

    let svc = Arc::new(OllamaService::new(emb_cfg)?);
    let embedder = Arc::new(OllamaEmbedder::new(svc, cfg.embedding_dim));
    let index = Arc::new(QdrantIndex::new(&cfg)?);

    Ok(MovieCatalog::connect(cfg, index, embedder).await?)
}

async fn run(cli: &Cli, catalog: &MovieCatalog) -> anyhow::Result<()> {
    match &cli.command {
        Command::Status => {
            let st = catalog.status().await?;
            let genres = catalog.list_known_genres(None).await?;
            if cli.json {
                println!(
                    "{}",
                    json!({
                        "collection": catalog.config().collection,
                        "points_count": st.points_count,
                        "vector_size": st.vector_size,
                        "known_genres": genres.len(),
                    })
                );
            } else {
                println!("{}", catalog.config().collection.bold());
                println!("  points:       {}", st.points_count);
                match st.vector_size {
                    Some(n) => println!("  vector size:  {n}"),
                    None => println!("  vector size:  {}", "unknown".dimmed()),
                }
                println!("  known genres: {}", genres.len());
            }
        }

        Command::Genres { sample } => {
            let genres = catalog.list_known_genres(*sample).await?;
            if cli.json {
                println!("{}", json!(genres));
            } else {
                for g in genres {
                    println!("{g}");
                }
            }
        }

        Command::Search {
            query,
            top_k,
            genres,
            year_min,
            year_max,
            posters,
        } => {
            let q = SearchQuery::new(query, *top_k)
                .with_genres(genres.iter().cloned())
                .with_years(*year_min, *year_max);
            let hits = catalog.search(&q).await?;
            let urls = if *posters {
                resolve_posters(&hits).await?
            } else {
                vec![None; hits.len()]
            };
            print_hits(cli.json, &hits, &urls);
        }

        Command::GenreCounts { genres } => {
            let genres = if genres.is_empty() {
                let mut known = catalog.list_known_genres(None).await?;
                known.truncate(DEFAULT_GENRE_COUNTS);
                known
            } else {
                genres.clone()
            };
            let rows = catalog.counts_by_genre(genres.as_slice()).await?;
            print_genre_counts(cli.json, &rows);
        }

        Command::Decades { decades } => {
            let rows = catalog.decade_mean_vote(decades).await?;
            print_decades(cli.json, &rows);
        }
    }
    Ok(())
}

async fn resolve_posters(hits: &[ScoredHit]) -> anyhow::Result<Vec<Option<String>>> {
    let cfg = PosterConfig::from_env();
    if !cfg.enabled() {
        eprintln!(
            "{}",
            "TMDB_API_KEY is not set; posters are skipped".yellow()
        );
    }
    let client = TmdbPosterClient::new(cfg)?;

    let mut urls = Vec::with_capacity(hits.len());
    for h in hits {
        let q = PosterQuery::new(h.payload.tmdb_id, h.payload.title.clone());
        urls.push(client.poster_url(&q).await);
    }
    Ok(urls)
}

fn print_hits(as_json: bool, hits: &[ScoredHit], posters: &[Option<String>]) {
    if as_json {
        let rows: Vec<_> = hits
            .iter()
            .zip(posters)
            .map(|(h, p)| {
                json!({
                    "rank": h.rank,
                    "id": h.id,
                    "score": h.score,
                    "title": h.payload.title,
                    "genres": h.payload.genres,
                    "release_date": h.payload.release_date,
                    "vote_average": h.payload.vote_average,
                    "popularity": h.payload.popularity,
                    "tmdb_id": h.payload.tmdb_id,
                    "poster_url": p,
                })
            })
            .collect();
        println!("{}", json!(rows));
        return;
    }

    if hits.is_empty() {
        println!("{}", "No results.".yellow());
        return;
    }
    for (h, p) in hits.iter().zip(posters) {
        let title = h.payload.title.as_deref().unwrap_or("(untitled)");
        let year = h
            .payload
            .release_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "?".into());
        let vote = h
            .payload
            .vote_average
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:>3}. {} ({}) {} vote {}  [{}]",
            h.rank,
            title.bold(),
            year,
            format!("{:.3}", h.score).cyan(),
            vote,
            h.payload.genres.join(", ").dimmed()
        );
        if let Some(url) = p {
            println!("     {}", url.underline());
        }
    }
}

fn print_genre_counts(as_json: bool, rows: &[GenreCount]) {
    if as_json {
        println!("{}", json!(rows));
        return;
    }
    for r in rows {
        println!("{:<20} {}", r.genre, r.count.to_string().green());
    }
}

fn print_decades(as_json: bool, rows: &[DecadeStat]) {
    if as_json {
        // NaN has no JSON form; an empty decade is reported as null.
        let rows: Vec<_> = rows
            .iter()
            .map(|r| json!({ "decade": r.decade, "mean_vote": r.mean(), "n": r.n }))
            .collect();
        println!("{}", json!(rows));
        return;
    }
    for r in rows {
        let mean = r
            .mean()
            .map(|m| format!("{m:.2}").green())
            .unwrap_or_else(|| "n/a".dimmed());
        println!("{}s  {}  (n={})", r.decade, mean, r.n);
    }
}
