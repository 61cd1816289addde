use std::str::FromStr;

use serde::Deserialize;

use super::record::{Ruleset, Season};

/// Name the scoring site gives the tie-break round group.
pub const TIE_BREAK_ROUND_NAME: &str = "Tie Break";

/// Match payload as served by the scoring site.
///
/// `players` is empty until the match has been played.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMatch {
    #[serde(default)]
    pub players: Vec<RawPlayer>,
    #[serde(default)]
    pub rounds: Vec<RawRound>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayer {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub forfeit: bool,
    #[serde(default)]
    pub score: u32,
}

/// A round group: one game per player.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRound {
    #[serde(default)]
    pub name: String,
    pub order: u8,
    #[serde(default)]
    pub games: Vec<RawGame>,
}

impl RawRound {
    pub fn is_tie_break(&self) -> bool {
        self.name == TIE_BREAK_ROUND_NAME
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGame {
    pub player: u32,
    #[serde(rename = "Axes", default)]
    pub axes: Vec<RawAxe>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAxe {
    pub order: u8,
    pub score: u32,
    #[serde(default)]
    pub clutch_called: bool,
}

/// Player profile listing with every league season the player took part in.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProfile {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub leagues: Vec<RawSeason>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeason {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub year: u32,
    #[serde(default)]
    pub ruleset: Option<String>,
    #[serde(default)]
    pub season_rank: u32,
    #[serde(default)]
    pub playoff_rank: u32,
    #[serde(default)]
    pub weeks: Vec<RawWeek>,
}

impl RawSeason {
    pub fn to_season(&self) -> Season {
        Season {
            season_id: self.id,
            year: self.year,
            ruleset: self
                .ruleset
                .as_deref()
                .and_then(|r| Ruleset::from_str(r.trim()).ok())
                .unwrap_or_default(),
            name: self.name.trim().to_string(),
            season_rank: self.season_rank,
            playoff_rank: self.playoff_rank,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWeek {
    pub week: u32,
    #[serde(default)]
    pub matches: Vec<RawMatchRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMatchRef {
    pub id: u32,
}
