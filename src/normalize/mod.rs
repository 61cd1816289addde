//! Turns a raw match payload into validated per-player rounds and throws.
//!
//! The transform is pure: nothing here touches the network or the database,
//! and the raw payload is only read.

pub mod status;

use std::cmp::Ordering;

use itertools::Itertools;

use crate::model::{
    Profile, RawAxe, RawMatch, RawPlayer, Round, RoundOutcome, Target, Throw, Tool,
    AXES_PER_HATCHET_ROUND, HATCHET_ROUNDS,
};

pub use status::{resolve_status, MatchResolution};

/// Both players of one match after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMatch {
    pub match_id: u32,
    /// The payload carried no players, so the match has not been played yet.
    pub unplayed: bool,
    pub profile: Option<PlayerResult>,
    pub opponent: Option<PlayerResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerResult {
    pub profile_id: u32,
    pub name: String,
    pub forfeit: bool,
    /// Wrong number of rounds or axes, or unusable axe orders; `rounds` and
    /// `throws` are empty.
    pub invalid: bool,
    pub score: u32,
    pub rounds: Vec<Round>,
    pub throws: Vec<Throw>,
}

impl PlayerResult {
    pub fn to_profile(&self) -> Profile {
        Profile {
            profile_id: self.profile_id,
            name: self.name.clone(),
        }
    }
}

/// One round group's game for a single player.
struct PlayedRound<'a> {
    round_id: u8,
    tie_break: bool,
    axes: &'a [RawAxe],
}

/// Normalize the payload of `match_id` from the point of view of `profile_id`.
pub fn normalize_match(match_id: u32, raw: &RawMatch, profile_id: u32) -> NormalizedMatch {
    if raw.players.is_empty() {
        return NormalizedMatch {
            match_id,
            unplayed: true,
            profile: None,
            opponent: None,
        };
    }

    let (tracked, others): (Vec<&RawPlayer>, Vec<&RawPlayer>) =
        raw.players.iter().partition(|p| p.id == profile_id);
    let profile = tracked
        .first()
        .map(|player| normalize_player(match_id, raw, player));
    let opponent = others
        .first()
        .map(|player| normalize_player(match_id, raw, player));

    let profile = match (profile, &opponent) {
        (Some(profile), Some(opponent)) if !profile.forfeit && !opponent.forfeit => {
            Some(PlayerResult {
                rounds: compare_rounds(&profile.rounds, &opponent.rounds),
                ..profile
            })
        }
        (profile, _) => profile,
    };

    NormalizedMatch {
        match_id,
        unplayed: false,
        profile,
        opponent,
    }
}

/// Assign round outcomes by comparing the two round lists position by position.
///
/// Rounds are paired by index, not by round id. A round missing on the
/// opponent's side counts as a score of 0, so an opponent whose rounds were
/// rejected as invalid loses every comparison.
pub fn compare_rounds(profile_rounds: &[Round], opponent_rounds: &[Round]) -> Vec<Round> {
    profile_rounds
        .iter()
        .enumerate()
        .map(|(i, round)| {
            let theirs = opponent_rounds.get(i).map_or(0, |r| r.score);
            Round {
                outcome: Some(round_outcome(round.score, theirs)),
                ..round.clone()
            }
        })
        .collect()
}

fn round_outcome(ours: u32, theirs: u32) -> RoundOutcome {
    match ours.cmp(&theirs) {
        Ordering::Greater => RoundOutcome::Win,
        Ordering::Equal => RoundOutcome::Tie,
        Ordering::Less => RoundOutcome::Loss,
    }
}

fn normalize_player(match_id: u32, raw: &RawMatch, player: &RawPlayer) -> PlayerResult {
    let result = PlayerResult {
        profile_id: player.id,
        name: player.name.trim().to_string(),
        forfeit: player.forfeit,
        invalid: false,
        score: player.score,
        rounds: Vec::new(),
        throws: Vec::new(),
    };
    if player.forfeit {
        return result;
    }

    let player_id = player.id;
    let (big_axe, hatchet): (Vec<PlayedRound>, Vec<PlayedRound>) = raw
        .rounds
        .iter()
        .flat_map(move |round| {
            round
                .games
                .iter()
                .filter(move |game| game.player == player_id)
                .map(move |game| PlayedRound {
                    round_id: round.order,
                    tie_break: round.is_tie_break(),
                    axes: &game.axes,
                })
        })
        .partition(|played| played.tie_break);

    if !is_complete(&hatchet, &big_axe) {
        return PlayerResult {
            invalid: true,
            ..result
        };
    }

    let (rounds, throws): (Vec<Round>, Vec<Vec<Throw>>) = hatchet
        .iter()
        .chain(big_axe.iter())
        .map(|played| build_round(match_id, played))
        .unzip();

    PlayerResult {
        rounds,
        throws: throws.into_iter().flatten().collect(),
        ..result
    }
}

fn is_complete(hatchet: &[PlayedRound], big_axe: &[PlayedRound]) -> bool {
    hatchet.len() == HATCHET_ROUNDS
        && big_axe.len() <= 1
        && hatchet
            .iter()
            .all(|played| played.axes.len() == AXES_PER_HATCHET_ROUND)
        && hatchet
            .iter()
            .chain(big_axe.iter())
            .all(|played| has_distinct_throw_ids(played.axes))
}

/// Axe orders become throw ids, so they must be unique within the round and
/// fall in `1..=5`.
fn has_distinct_throw_ids(axes: &[RawAxe]) -> bool {
    !axes.is_empty()
        && axes
            .iter()
            .all(|axe| (1..=AXES_PER_HATCHET_ROUND).contains(&usize::from(axe.order)))
        && axes.iter().map(|axe| axe.order).all_unique()
}

fn build_round(match_id: u32, played: &PlayedRound) -> (Round, Vec<Throw>) {
    let tool = Tool::for_round(played.round_id);
    let throws = played
        .axes
        .iter()
        .sorted_by_key(|axe| axe.order)
        .map(|axe| Throw {
            match_id,
            round_id: played.round_id,
            throw_id: axe.order,
            tool,
            target: if axe.clutch_called {
                Target::Clutch
            } else {
                Target::Bullseye
            },
            score: axe.score,
        })
        .collect_vec();

    let round = Round {
        match_id,
        round_id: played.round_id,
        outcome: None,
        score: throws.iter().map(|t| t.score).sum(),
    };
    (round, throws)
}
