use chrono::{DateTime, Utc};
use serde::Serialize;

use super::record::{Match, Profile, Round, Season, Throw};
use super::stats::StatsSummary;

/// Every processed throw of one player, rolled up career → season → week → match.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Career {
    pub profile: Profile,
    pub generated_at: DateTime<Utc>,
    pub stats: StatsSummary,
    pub seasons: Vec<SeasonNode>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonNode {
    pub season: Season,
    pub stats: StatsSummary,
    pub weeks: Vec<WeekNode>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekNode {
    pub week_id: u32,
    pub stats: StatsSummary,
    pub matches: Vec<MatchNode>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchNode {
    #[serde(rename = "match")]
    pub r#match: Match,
    pub opponent_name: Option<String>,
    pub stats: StatsSummary,
    pub rounds: Vec<RoundNode>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundNode {
    pub round: Round,
    pub throws: Vec<Throw>,
}
