use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// Round id of the tie-break round, thrown with the big axe.
pub const BIG_AXE_ROUND_ID: u8 = 4;

/// Number of hatchet rounds in a complete match.
pub const HATCHET_ROUNDS: usize = 3;

/// Number of axes thrown in every hatchet round.
pub const AXES_PER_HATCHET_ROUND: usize = 5;

/// League rules a season was played under.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Ruleset {
    #[default]
    Unknown,
    Standard,
    Premier,
}

/// Result of a whole match from the tracked player's point of view.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
pub enum MatchOutcome {
    #[default]
    #[strum(serialize = "TBD")]
    #[serde(rename = "TBD")]
    Tbd,
    #[strum(serialize = "forfeit")]
    #[serde(rename = "forfeit")]
    Forfeit,
    #[strum(serialize = "loss")]
    #[serde(rename = "loss")]
    Loss,
    /// Lost in the big axe tie-break.
    #[strum(serialize = "OTL")]
    #[serde(rename = "OTL")]
    Otl,
    #[strum(serialize = "win")]
    #[serde(rename = "win")]
    Win,
    #[strum(serialize = "tie")]
    #[serde(rename = "tie")]
    Tie,
}

/// Processing lifecycle of a match.
///
/// Matches are discovered as `New` and leave it exactly once. `Unplayed` and
/// `Invalid` may later become `Processed` when a rescrape yields full data.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Discovered, not analyzed yet.
    #[default]
    New,
    /// No throw data available yet.
    Unplayed,
    /// The tracked player forfeited; no throw data is coming.
    Forfeit,
    /// Wrong round or throw count; may be fixed upstream later.
    Invalid,
    Processed,
}

impl MatchStatus {
    /// Statuses picked up again by the processing loop.
    pub const PENDING: [MatchStatus; 2] = [MatchStatus::New, MatchStatus::Unplayed];
}

/// Result of a single round, derived from both players' round scores.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoundOutcome {
    Win,
    Tie,
    Loss,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
pub enum Tool {
    #[strum(serialize = "hatchet")]
    #[serde(rename = "hatchet")]
    Hatchet,
    #[strum(serialize = "big axe")]
    #[serde(rename = "big axe")]
    BigAxe,
}

impl Tool {
    /// The tool is fixed by the round: only the tie-break uses the big axe.
    pub fn for_round(round_id: u8) -> Self {
        if round_id == BIG_AXE_ROUND_ID {
            Tool::BigAxe
        } else {
            Tool::Hatchet
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Bullseye,
    Clutch,
}

impl Target {
    /// Every score a throw at this target can legally earn.
    pub fn buckets(self) -> &'static [u32] {
        match self {
            Target::Bullseye => &[0, 1, 3, 5],
            Target::Clutch => &[0, 5, 7],
        }
    }

    pub fn is_legal_score(self, score: u32) -> bool {
        self.buckets().contains(&score)
    }
}

/// A player, tracked or opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub profile_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub season_id: u32,
    pub year: u32,
    pub ruleset: Ruleset,
    pub name: String,
    pub season_rank: u32,
    pub playoff_rank: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub season_id: u32,
    pub week_id: u32,
    pub match_id: u32,
    /// `0` while the opponent is unknown.
    pub opponent_id: u32,
    pub score: u32,
    pub outcome: MatchOutcome,
    pub status: MatchStatus,
}

impl Match {
    /// A freshly discovered match with no per-round data yet.
    pub fn discovered(season_id: u32, week_id: u32, match_id: u32) -> Self {
        Self {
            season_id,
            week_id,
            match_id,
            opponent_id: 0,
            score: 0,
            outcome: MatchOutcome::Tbd,
            status: MatchStatus::New,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub match_id: u32,
    pub round_id: u8,
    /// `None` when there was no opponent round list to compare against.
    pub outcome: Option<RoundOutcome>,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Throw {
    pub match_id: u32,
    pub round_id: u8,
    pub throw_id: u8,
    pub tool: Tool,
    pub target: Target,
    pub score: u32,
}
