use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "movie-dashboard", about = "Semantic search and analytics over a movie catalog")]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collection size, vector size and number of known genres
    Status,

    /// Genres seen in a sample of the catalog
    Genres {
        /// Number of payloads to sample (default: GENRE_SAMPLE)
        #[arg(long)]
        sample: Option<usize>,
    },

    /// Free-text semantic search
    Search {
        query: String,

        #[arg(long, short = 'k', default_value = "10")]
        top_k: u64,

        /// Genre to accept (repeatable, OR semantics)
        #[arg(long = "genre", short = 'g')]
        genres: Vec<String>,

        #[arg(long)]
        year_min: Option<i32>,

        #[arg(long)]
        year_max: Option<i32>,

        /// Resolve TMDB poster URLs for the hits
        #[arg(long)]
        posters: bool,
    },

    /// Number of items per genre (default: first 8 known genres)
    GenreCounts { genres: Vec<String> },

    /// Mean vote per decade (e.g. 1980 1990 2000)
    Decades {
        #[arg(required = true)]
        decades: Vec<i32>,
    },
}
