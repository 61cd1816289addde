use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::model::MatchStatus;
use crate::store::ScoreStore;

/// Snapshot of what the database currently holds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseReport {
    pub generated_at: DateTime<Utc>,
    pub profiles: usize,
    pub seasons: usize,
    pub matches: usize,
    pub rounds: usize,
    pub throws: usize,
    /// Matches per status; every status is present, possibly with 0.
    pub matches_by_status: BTreeMap<String, usize>,
}

impl DatabaseReport {
    pub fn collect<S: ScoreStore + ?Sized>(store: &S) -> Result<Self> {
        let counts = store.table_counts()?;
        let mut matches_by_status: BTreeMap<String, usize> = [
            MatchStatus::New,
            MatchStatus::Unplayed,
            MatchStatus::Forfeit,
            MatchStatus::Invalid,
            MatchStatus::Processed,
        ]
        .iter()
        .map(|status| (status.to_string(), 0))
        .collect();
        for stored in store.matches()? {
            *matches_by_status.entry(stored.status.to_string()).or_default() += 1;
        }

        Ok(Self {
            generated_at: Utc::now(),
            profiles: counts.profiles,
            seasons: counts.seasons,
            matches: counts.matches,
            rounds: counts.rounds,
            throws: counts.throws,
            matches_by_status,
        })
    }
}

impl Display for DatabaseReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database report ({})", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "  profiles: {}", self.profiles)?;
        writeln!(f, "  seasons:  {}", self.seasons)?;
        writeln!(f, "  matches:  {}", self.matches)?;
        for (status, count) in &self.matches_by_status {
            writeln!(f, "    {status}: {count}")?;
        }
        writeln!(f, "  rounds:   {}", self.rounds)?;
        write!(f, "  throws:   {}", self.throws)
    }
}
