//! Scrape axe throwing league results, store them idempotently and roll them
//! up into per-player throw statistics.

pub use client::{MatchSource, ScorerClient};
pub use config::Config;
pub use error::{AxeError, Result};
pub use model::*;
pub use normalize::{
    compare_rounds, normalize_match, resolve_status, MatchResolution, NormalizedMatch,
    PlayerResult,
};
pub use pipeline::{
    discover_matches, process_match, process_matches, run_scrape, BatchReport, DiscoveryReport,
    ScrapeReport,
};
pub use report::DatabaseReport;
pub use stats::{aggregate, build_career, Tally};
pub use store::{ScoreStore, SqliteScoreStore, TableCounts};

mod client;
pub mod config;
mod error;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub(crate) mod scorer;
pub mod stats;
pub mod store;
