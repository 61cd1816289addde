//! Discovery and processing loops.
//!
//! Both loops are plain reruns of keyed upserts: running them again after a
//! crash or a partial failure picks up where the last run stopped.

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::client::MatchSource;
use crate::config::Config;
use crate::error::Result;
use crate::model::{Match, MatchStatus, Profile};
use crate::normalize::{normalize_match, resolve_status};
use crate::store::ScoreStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    pub seasons: usize,
    pub matches: usize,
}

/// Matches handled by one processing run, per terminal status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub unplayed: usize,
    pub forfeit: usize,
    pub invalid: usize,
    /// Fetch, decode or write failures; these matches stay pending.
    pub failed: usize,
}

impl BatchReport {
    fn record(&mut self, status: MatchStatus) {
        match status {
            MatchStatus::Processed => self.processed += 1,
            MatchStatus::Unplayed => self.unplayed += 1,
            MatchStatus::Forfeit => self.forfeit += 1,
            MatchStatus::Invalid => self.invalid += 1,
            // resolutions never go back to new
            MatchStatus::New => {}
        }
    }

    pub fn total(&self) -> usize {
        self.processed + self.unplayed + self.forfeit + self.invalid + self.failed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeReport {
    /// `None` when the profile listing could not be fetched.
    pub discovery: Option<DiscoveryReport>,
    pub batch: BatchReport,
}

/// Record the tracked player, their seasons and every listed match.
#[instrument(skip(source, store))]
pub async fn discover_matches<M, S>(
    source: &M,
    store: &S,
    profile_id: u32,
) -> Result<DiscoveryReport>
where
    M: MatchSource,
    S: ScoreStore + ?Sized,
{
    let listing = source.get_profile(profile_id).await?;
    if !listing.name.trim().is_empty() {
        store.upsert_profile(&Profile {
            profile_id,
            name: listing.name.trim().to_string(),
        })?;
    }

    let mut report = DiscoveryReport::default();
    for raw_season in &listing.leagues {
        store.upsert_season(&raw_season.to_season())?;
        report.seasons += 1;
        for week in &raw_season.weeks {
            for listed in &week.matches {
                store.upsert_discovered_match(&Match::discovered(
                    raw_season.id,
                    week.week,
                    listed.id,
                ))?;
                report.matches += 1;
            }
        }
    }

    info!(
        profile_id,
        seasons = report.seasons,
        matches = report.matches,
        "discovered matches"
    );
    Ok(report)
}

/// Fetch, normalize and record a single match. Returns its terminal status.
pub async fn process_match<M, S>(
    source: &M,
    store: &S,
    profile_id: u32,
    match_id: u32,
) -> Result<MatchStatus>
where
    M: MatchSource,
    S: ScoreStore + ?Sized,
{
    let raw = source.get_match(profile_id, match_id).await?;
    let resolution = resolve_status(&normalize_match(match_id, &raw, profile_id));
    store.record_resolution(&resolution)?;
    debug!(match_id, status = %resolution.status, outcome = %resolution.outcome, "processed match");
    Ok(resolution.status)
}

/// Process every match in one of `statuses`, one at a time.
///
/// A failure on one match is logged and counted; the loop moves on.
#[instrument(skip(source, store))]
pub async fn process_matches<M, S>(
    source: &M,
    store: &S,
    profile_id: u32,
    statuses: &[MatchStatus],
) -> Result<BatchReport>
where
    M: MatchSource,
    S: ScoreStore + ?Sized,
{
    let pending = store.matches_with_status(statuses)?;
    info!(count = pending.len(), "processing pending matches");

    let mut report = BatchReport::default();
    for pending_match in pending {
        match process_match(source, store, profile_id, pending_match.match_id).await {
            Ok(status) => report.record(status),
            Err(e) => {
                error!(
                    match_id = pending_match.match_id,
                    season_id = pending_match.season_id,
                    week_id = pending_match.week_id,
                    error = %e,
                    "failed to process match"
                );
                report.failed += 1;
            }
        }
    }

    info!(
        total = report.total(),
        processed = report.processed,
        unplayed = report.unplayed,
        forfeit = report.forfeit,
        invalid = report.invalid,
        failed = report.failed,
        "finished processing matches"
    );
    Ok(report)
}

/// Discovery followed by processing, as configured.
///
/// A failed discovery only skips discovery; matches already stored are
/// still processed.
pub async fn run_scrape<M, S>(source: &M, store: &S, config: &Config) -> Result<ScrapeReport>
where
    M: MatchSource,
    S: ScoreStore + ?Sized,
{
    let discovery = match discover_matches(source, store, config.profile_id).await {
        Ok(report) => Some(report),
        Err(e) => {
            warn!(profile_id = config.profile_id, error = %e, "discovery failed, processing stored matches only");
            None
        }
    };

    let mut statuses = MatchStatus::PENDING.to_vec();
    if config.retry_invalid {
        statuses.push(MatchStatus::Invalid);
    }
    let batch = process_matches(source, store, config.profile_id, &statuses).await?;

    Ok(ScrapeReport { discovery, batch })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;
    use crate::error::AxeError;
    use crate::model::{RawMatch, RawProfile};
    use crate::normalize::tests::{raw_match, PROFILE_ID};
    use crate::store::SqliteScoreStore;

    #[derive(Default)]
    struct FixtureSource {
        profile: Option<RawProfile>,
        matches: HashMap<u32, RawMatch>,
    }

    impl MatchSource for FixtureSource {
        async fn get_profile(&self, profile_id: u32) -> Result<RawProfile> {
            self.profile.clone().ok_or(AxeError::UnexpectedStatus {
                url: format!("fixture/player/{profile_id}"),
                status: reqwest::StatusCode::NOT_FOUND,
            })
        }

        async fn get_match(&self, profile_id: u32, match_id: u32) -> Result<RawMatch> {
            self.matches
                .get(&match_id)
                .cloned()
                .ok_or(AxeError::UnexpectedStatus {
                    url: format!("fixture/player/{profile_id}/match/{match_id}"),
                    status: reqwest::StatusCode::NOT_FOUND,
                })
        }
    }

    fn listing(match_ids: &[u32]) -> RawProfile {
        let matches = match_ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>();
        serde_json::from_value(json!({
            "id": PROFILE_ID,
            "name": "Tracked",
            "leagues": [{
                "id": 7,
                "name": "Fall League",
                "year": 2024,
                "ruleset": "premier",
                "weeks": [{ "week": 1, "matches": matches }]
            }]
        }))
        .unwrap()
    }

    fn config() -> Config {
        Config {
            profile_id: PROFILE_ID,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_failed_match_does_not_stop_batch() {
        let mut invalid = raw_match(&[9, 8, 7], &[9, 7, 8]);
        invalid.rounds[0].games[0].axes.pop();
        let source = FixtureSource {
            profile: Some(listing(&[1, 2, 3, 4])),
            matches: HashMap::from([
                (1, raw_match(&[9, 8, 7], &[9, 7, 8])),
                (3, RawMatch::default()),
                (4, invalid),
            ]),
        };
        let store = SqliteScoreStore::open_in_memory().unwrap();

        let report = run_scrape(&source, &store, &config()).await.unwrap();

        assert_eq!(
            report.discovery,
            Some(DiscoveryReport {
                seasons: 1,
                matches: 4
            })
        );
        assert_eq!(
            report.batch,
            BatchReport {
                processed: 1,
                unplayed: 1,
                forfeit: 0,
                invalid: 1,
                failed: 1,
            }
        );
        let statuses: Vec<MatchStatus> = store.matches().unwrap().iter().map(|m| m.status).collect();
        assert_eq!(
            statuses,
            vec![
                MatchStatus::Processed,
                MatchStatus::New,
                MatchStatus::Unplayed,
                MatchStatus::Invalid
            ]
        );
    }

    #[tokio::test]
    async fn test_rerun_only_touches_pending_and_keeps_rows() {
        let source = FixtureSource {
            profile: Some(listing(&[1, 2])),
            matches: HashMap::from([
                (1, raw_match(&[9, 8, 7], &[9, 7, 8])),
                (2, RawMatch::default()),
            ]),
        };
        let store = SqliteScoreStore::open_in_memory().unwrap();

        run_scrape(&source, &store, &config()).await.unwrap();
        let throws = store.throws().unwrap();
        let second = run_scrape(&source, &store, &config()).await.unwrap();

        assert_eq!(second.batch.total(), 1);
        assert_eq!(second.batch.unplayed, 1);
        assert_eq!(store.throws().unwrap(), throws);
        assert_eq!(store.matches().unwrap()[0].status, MatchStatus::Processed);
    }

    #[tokio::test]
    async fn test_discovery_failure_still_processes_stored_matches() {
        let source = FixtureSource {
            profile: None,
            matches: HashMap::from([(5, raw_match(&[9, 8, 7], &[9, 7, 8]))]),
        };
        let store = SqliteScoreStore::open_in_memory().unwrap();
        store
            .upsert_discovered_match(&Match::discovered(7, 1, 5))
            .unwrap();

        let report = run_scrape(&source, &store, &config()).await.unwrap();

        assert!(report.discovery.is_none());
        assert_eq!(report.batch.processed, 1);
    }

    #[tokio::test]
    async fn test_retry_invalid_reprocesses_fixed_match() {
        let mut broken = raw_match(&[9, 8, 7], &[9, 7, 8]);
        broken.rounds[1].games[0].axes.pop();
        let mut source = FixtureSource {
            profile: Some(listing(&[1])),
            matches: HashMap::from([(1, broken)]),
        };
        let store = SqliteScoreStore::open_in_memory().unwrap();
        run_scrape(&source, &store, &config()).await.unwrap();
        assert_eq!(store.matches().unwrap()[0].status, MatchStatus::Invalid);

        source.matches.insert(1, raw_match(&[9, 8, 7], &[9, 7, 8]));
        let skipped = run_scrape(&source, &store, &config()).await.unwrap();
        assert_eq!(skipped.batch.total(), 0);

        let retry = Config {
            retry_invalid: true,
            ..config()
        };
        let report = run_scrape(&source, &store, &retry).await.unwrap();
        assert_eq!(report.batch.processed, 1);
        assert_eq!(store.matches().unwrap()[0].status, MatchStatus::Processed);
    }

    #[tokio::test]
    async fn test_discovery_records_profile_and_season() {
        let source = FixtureSource {
            profile: Some(listing(&[1])),
            ..Default::default()
        };
        let store = SqliteScoreStore::open_in_memory().unwrap();

        discover_matches(&source, &store, PROFILE_ID).await.unwrap();

        assert_eq!(store.profile(PROFILE_ID).unwrap().unwrap().name, "Tracked");
        let seasons = store.seasons().unwrap();
        assert_eq!(seasons[0].name, "Fall League");
        assert_eq!(seasons[0].ruleset, crate::model::Ruleset::Premier);
        assert_eq!(store.matches().unwrap()[0].status, MatchStatus::New);
    }
}
