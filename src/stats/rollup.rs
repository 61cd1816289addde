use std::collections::HashMap;

use chrono::Utc;
use itertools::Itertools;
use tracing::{debug, instrument};

use super::Tally;
use crate::error::Result;
use crate::model::{
    Career, Match, MatchNode, MatchStatus, Profile, Round, RoundNode, SeasonNode, Throw, WeekNode,
};
use crate::store::ScoreStore;

/// Build the career → season → week → match → round tree of a player.
///
/// Only processed matches contribute; seasons without one are left out.
/// Each node's statistics are the merged tallies of its children.
#[instrument(skip(store))]
pub fn build_career<S: ScoreStore + ?Sized>(store: &S, profile_id: u32) -> Result<Career> {
    let profile = store.profile(profile_id)?.unwrap_or_else(|| Profile {
        profile_id,
        name: "Unknown".to_string(),
    });
    let names: HashMap<u32, String> = store
        .profiles()?
        .into_iter()
        .map(|p| (p.profile_id, p.name))
        .collect();

    let mut matches_by_season = store
        .matches()?
        .into_iter()
        .filter(|m| m.status == MatchStatus::Processed)
        .into_group_map_by(|m| m.season_id);
    let mut rounds_by_match = store.rounds()?.into_iter().into_group_map_by(|r| r.match_id);
    let mut throws_by_round = store
        .throws()?
        .into_iter()
        .into_group_map_by(|t| (t.match_id, t.round_id));

    let mut career_tally = Tally::new();
    let mut seasons = Vec::new();
    for season in store
        .seasons()?
        .into_iter()
        .sorted_by_key(|s| (s.year, s.season_id))
    {
        let Some(season_matches) = matches_by_season.remove(&season.season_id) else {
            continue;
        };

        let mut season_tally = Tally::new();
        let mut weeks = Vec::new();
        for (week_id, week_matches) in season_matches
            .into_iter()
            .into_group_map_by(|m| m.week_id)
            .into_iter()
            .sorted_by_key(|(week_id, _)| *week_id)
        {
            let mut week_tally = Tally::new();
            let mut matches = Vec::new();
            for r#match in week_matches.into_iter().sorted_by_key(|m| m.match_id) {
                let rounds = rounds_by_match.remove(&r#match.match_id).unwrap_or_default();
                let (node, tally) = match_node(r#match, rounds, &mut throws_by_round, &names)?;
                week_tally.merge(&tally);
                matches.push(node);
            }
            season_tally.merge(&week_tally);
            weeks.push(WeekNode {
                week_id,
                stats: week_tally.summary(),
                matches,
            });
        }

        career_tally.merge(&season_tally);
        seasons.push(SeasonNode {
            season,
            stats: season_tally.summary(),
            weeks,
        });
    }

    debug!(profile_id, seasons = seasons.len(), "built career rollup");
    Ok(Career {
        profile,
        generated_at: Utc::now(),
        stats: career_tally.summary(),
        seasons,
    })
}

fn match_node(
    r#match: Match,
    rounds: Vec<Round>,
    throws_by_round: &mut HashMap<(u32, u8), Vec<Throw>>,
    names: &HashMap<u32, String>,
) -> Result<(MatchNode, Tally)> {
    let mut tally = Tally::new();
    let mut round_nodes = Vec::new();
    for round in rounds.into_iter().sorted_by_key(|r| r.round_id) {
        let throws = throws_by_round
            .remove(&(round.match_id, round.round_id))
            .unwrap_or_default()
            .into_iter()
            .sorted_by_key(|t| t.throw_id)
            .collect_vec();
        for throw in &throws {
            tally.add(throw)?;
        }
        round_nodes.push(RoundNode { round, throws });
    }

    let node = MatchNode {
        opponent_name: names.get(&r#match.opponent_id).cloned(),
        stats: tally.summary(),
        rounds: round_nodes,
        r#match,
    };
    Ok((node, tally))
}
