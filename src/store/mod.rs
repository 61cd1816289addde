//! Persistence gateway for profiles, seasons, matches, rounds and throws.

mod schema;
mod sqlite;

pub use sqlite::SqliteScoreStore;

use crate::error::Result;
use crate::model::{Match, MatchStatus, Profile, Round, Season, Throw};
use crate::normalize::MatchResolution;

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub profiles: usize,
    pub seasons: usize,
    pub matches: usize,
    pub rounds: usize,
    pub throws: usize,
}

/// Storage backend for scraped results.
///
/// Every write is keyed by the natural identity of the row, so replaying the
/// same writes leaves the store unchanged.
pub trait ScoreStore {
    // =========================================================================
    // Discovery
    // =========================================================================

    /// Insert or rename a profile.
    fn upsert_profile(&self, profile: &Profile) -> Result<()>;

    /// Insert a season or overwrite its mutable fields.
    fn upsert_season(&self, season: &Season) -> Result<()>;

    /// Insert a match in status `new`. An existing match only has its season
    /// and week refreshed; its status and results are kept.
    fn upsert_discovered_match(&self, discovered: &Match) -> Result<()>;

    // =========================================================================
    // Processing
    // =========================================================================

    /// Matches in any of `statuses`, ordered by match id.
    fn matches_with_status(&self, statuses: &[MatchStatus]) -> Result<Vec<Match>>;

    /// Write the outcome of processing one match in a single transaction.
    fn record_resolution(&self, resolution: &MatchResolution) -> Result<()>;

    // =========================================================================
    // Read back
    // =========================================================================

    fn profile(&self, profile_id: u32) -> Result<Option<Profile>>;

    fn profiles(&self) -> Result<Vec<Profile>>;

    fn seasons(&self) -> Result<Vec<Season>>;

    fn matches(&self) -> Result<Vec<Match>>;

    fn rounds(&self) -> Result<Vec<Round>>;

    fn throws(&self) -> Result<Vec<Throw>>;

    fn table_counts(&self) -> Result<TableCounts>;
}
