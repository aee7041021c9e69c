//! Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/tweets";

#[derive(Debug, Parser)]
#[command(name = "livescroll-feed", version, about)]
pub struct Args {
    /// Feed endpoint; pages are requested with `?query=` and `?nextToken=`.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Search term.  Without one the default feed is shown.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Title the list "Search Results" instead of "Latest feed".
    #[arg(long)]
    pub search: bool,

    /// JSON page (`{"tweets": [...], "nextToken": ...}`) to show before
    /// anything is fetched.
    #[arg(long, value_name = "FILE")]
    pub seed: Option<PathBuf>,

    /// Re-fetch page one every SECS seconds; 0 disables.
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    pub refresh_every: u64,

    /// HTTP timeout per request.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Directory for log files.  Defaults to the platform data directory.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Validated settings derived from [`Args`].
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub query: Option<String>,
    pub search_mode: bool,
    pub seed: Option<PathBuf>,
    pub refresh_every: Option<Duration>,
    pub timeout: Duration,
    pub log_dir: PathBuf,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let log_dir = args.log_dir.unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("livescroll-feed")
                .join("logs")
        });

        Self {
            endpoint: args.endpoint,
            query: args.query.filter(|q| !q.trim().is_empty()),
            search_mode: args.search,
            seed: args.seed,
            refresh_every: (args.refresh_every > 0).then(|| Duration::from_secs(args.refresh_every)),
            timeout: Duration::from_secs(args.timeout.max(1)),
            log_dir,
        }
    }
}

impl Config {
    pub fn from_args() -> Self {
        Args::parse().into()
    }
}
