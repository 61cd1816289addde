use std::cmp::Ordering;

use crate::model::{
    MatchOutcome, MatchStatus, Profile, Round, RoundOutcome, Throw, BIG_AXE_ROUND_ID,
};

use super::{NormalizedMatch, PlayerResult};

/// Terminal status of a processed match plus every row to write for it.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResolution {
    pub match_id: u32,
    pub status: MatchStatus,
    pub outcome: MatchOutcome,
    /// Tracked player's profile, refreshed whenever the payload names them.
    pub profile: Option<Profile>,
    pub opponent: Option<Profile>,
    /// Tracked player's total, only set for processed matches.
    pub score: Option<u32>,
    pub rounds: Vec<Round>,
    pub throws: Vec<Throw>,
}

impl MatchResolution {
    fn bare(match_id: u32, status: MatchStatus, outcome: MatchOutcome) -> Self {
        Self {
            match_id,
            status,
            outcome,
            profile: None,
            opponent: None,
            score: None,
            rounds: Vec::new(),
            throws: Vec::new(),
        }
    }
}

/// Decide which terminal status a normalized match enters.
pub fn resolve_status(normalized: &NormalizedMatch) -> MatchResolution {
    let match_id = normalized.match_id;
    if normalized.unplayed {
        return MatchResolution::bare(match_id, MatchStatus::Unplayed, MatchOutcome::Tbd);
    }

    let opponent = normalized.opponent.as_ref().map(PlayerResult::to_profile);
    let profile = match &normalized.profile {
        Some(profile) if !profile.forfeit => profile,
        tracked => {
            return MatchResolution {
                profile: tracked.as_ref().map(PlayerResult::to_profile),
                opponent,
                ..MatchResolution::bare(match_id, MatchStatus::Forfeit, MatchOutcome::Forfeit)
            };
        }
    };

    if profile.invalid {
        return MatchResolution {
            profile: Some(profile.to_profile()),
            opponent,
            ..MatchResolution::bare(match_id, MatchStatus::Invalid, MatchOutcome::Tbd)
        };
    }

    MatchResolution {
        match_id,
        status: MatchStatus::Processed,
        outcome: match_outcome(profile, normalized.opponent.as_ref()),
        profile: Some(profile.to_profile()),
        opponent,
        score: Some(profile.score),
        rounds: profile.rounds.clone(),
        throws: profile.throws.clone(),
    }
}

fn match_outcome(profile: &PlayerResult, opponent: Option<&PlayerResult>) -> MatchOutcome {
    match opponent {
        None => MatchOutcome::Tbd,
        Some(opponent) if opponent.forfeit => MatchOutcome::Win,
        Some(_) => outcome_from_rounds(&profile.rounds),
    }
}

/// Hatchet rounds decide the match; a level count goes to the big axe round.
fn outcome_from_rounds(rounds: &[Round]) -> MatchOutcome {
    let (big_axe, hatchet): (Vec<&Round>, Vec<&Round>) =
        rounds.iter().partition(|r| r.round_id == BIG_AXE_ROUND_ID);
    let count = |outcome: RoundOutcome| {
        hatchet
            .iter()
            .filter(|r| r.outcome == Some(outcome))
            .count()
    };

    match count(RoundOutcome::Win).cmp(&count(RoundOutcome::Loss)) {
        Ordering::Greater => MatchOutcome::Win,
        Ordering::Less => MatchOutcome::Loss,
        Ordering::Equal => match big_axe.first().and_then(|r| r.outcome) {
            Some(RoundOutcome::Win) => MatchOutcome::Win,
            Some(RoundOutcome::Loss) => MatchOutcome::Otl,
            Some(RoundOutcome::Tie) | None => MatchOutcome::Tie,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawMatch;
    use crate::normalize::normalize_match;
    use crate::normalize::tests::{raw_match, with_tie_break, OPPONENT_ID, PROFILE_ID};

    fn resolve(raw: &RawMatch) -> MatchResolution {
        resolve_status(&normalize_match(11, raw, PROFILE_ID))
    }

    #[test]
    fn test_unplayed_writes_nothing() {
        let resolution = resolve(&RawMatch::default());

        assert_eq!(resolution.status, MatchStatus::Unplayed);
        assert_eq!(resolution.outcome, MatchOutcome::Tbd);
        assert!(resolution.profile.is_none());
        assert!(resolution.opponent.is_none());
        assert!(resolution.score.is_none());
        assert!(resolution.throws.is_empty());
    }

    #[test]
    fn test_forfeit_keeps_opponent_identity() {
        let mut raw = raw_match(&[9, 8, 7], &[9, 7, 8]);
        raw.players[0].forfeit = true;
        let resolution = resolve(&raw);

        assert_eq!(resolution.status, MatchStatus::Forfeit);
        assert_eq!(resolution.outcome, MatchOutcome::Forfeit);
        assert_eq!(resolution.opponent.as_ref().unwrap().profile_id, OPPONENT_ID);
        assert!(resolution.rounds.is_empty());
        assert!(resolution.throws.is_empty());
        assert!(resolution.score.is_none());
    }

    #[test]
    fn test_missing_tracked_player_is_forfeit() {
        let mut raw = raw_match(&[9, 8, 7], &[9, 7, 8]);
        raw.players.remove(0);
        let resolution = resolve(&raw);

        assert_eq!(resolution.status, MatchStatus::Forfeit);
        assert!(resolution.profile.is_none());
        assert_eq!(resolution.opponent.as_ref().unwrap().profile_id, OPPONENT_ID);
    }

    #[test]
    fn test_invalid_records_opponent_but_no_throws() {
        let mut raw = raw_match(&[9, 8, 7], &[9, 7, 8]);
        raw.rounds[0].games[0].axes.pop();
        let resolution = resolve(&raw);

        assert_eq!(resolution.status, MatchStatus::Invalid);
        assert_eq!(resolution.outcome, MatchOutcome::Tbd);
        assert_eq!(
            resolution.opponent,
            Some(Profile {
                profile_id: OPPONENT_ID,
                name: "Opponent".to_string()
            })
        );
        assert!(resolution.throws.is_empty());
        assert!(resolution.score.is_none());
    }

    #[test]
    fn test_processed_carries_rounds_throws_and_score() {
        let raw = raw_match(&[9, 8, 7], &[9, 7, 8]);
        let resolution = resolve(&raw);

        assert_eq!(resolution.status, MatchStatus::Processed);
        assert_eq!(resolution.score, Some(24));
        assert_eq!(resolution.opponent.as_ref().unwrap().profile_id, OPPONENT_ID);
        assert_eq!(resolution.rounds.len(), 3);
        assert_eq!(resolution.throws.len(), 15);
        assert_eq!(resolution.outcome, MatchOutcome::Tie);
    }

    #[test]
    fn test_outcome_from_hatchet_rounds() {
        assert_eq!(resolve(&raw_match(&[9, 9, 9], &[9, 7, 8])).outcome, MatchOutcome::Win);
        assert_eq!(resolve(&raw_match(&[5, 9, 7], &[9, 7, 8])).outcome, MatchOutcome::Loss);
    }

    #[test]
    fn test_outcome_decided_by_big_axe() {
        let won = with_tie_break(raw_match(&[9, 8, 7], &[9, 7, 8]), &[(5, false)]);
        assert_eq!(resolve(&won).outcome, MatchOutcome::Win);

        let mut lost = with_tie_break(raw_match(&[9, 8, 7], &[9, 7, 8]), &[(0, false)]);
        lost.rounds[3].games[1].axes[0].score = 3;
        assert_eq!(resolve(&lost).outcome, MatchOutcome::Otl);
    }

    #[test]
    fn test_opponent_forfeit_is_a_win() {
        let mut raw = raw_match(&[9, 8, 7], &[9, 7, 8]);
        raw.players[1].forfeit = true;
        let resolution = resolve(&raw);

        assert_eq!(resolution.status, MatchStatus::Processed);
        assert_eq!(resolution.outcome, MatchOutcome::Win);
        assert!(resolution.rounds.iter().all(|r| r.outcome.is_none()));
    }
}
