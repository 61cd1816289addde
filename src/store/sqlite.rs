//! SQLite-backed score store.

use std::path::Path;
use std::str::FromStr;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::{debug, info};

use super::schema;
use super::{ScoreStore, TableCounts};
use crate::error::{AxeError, Result};
use crate::model::{Match, MatchStatus, Profile, Round, Season, Throw};
use crate::normalize::MatchResolution;

const MATCH_COLUMNS: &str =
    "seasonId, weekId, matchId, opponentId, score, outcome, status";

type MatchRow = (u32, u32, u32, u32, u32, String, String);

/// SQLite-backed score store.
pub struct SqliteScoreStore {
    conn: Connection,
}

impl SqliteScoreStore {
    /// Open (and create if needed) the database file at `db_path`.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        let store = Self::with_connection(conn)?;

        let counts = store.table_counts()?;
        info!(
            path = %db_path.display(),
            matches = counts.matches,
            throws = counts.throws,
            "score store ready"
        );
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(mut conn: Connection) -> Result<Self> {
        schema::create_if_needed(&mut conn)?;
        Ok(Self { conn })
    }

    /// Reclaim free pages. Run once at the end of a batch.
    pub fn vacuum(&self) -> Result<()> {
        self.conn.execute_batch("VACUUM")?;
        Ok(())
    }

    fn count(&self, table: &str) -> Result<usize> {
        let count: usize =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
        Ok(count)
    }
}

fn upsert_profile(conn: &Connection, profile: &Profile) -> Result<()> {
    conn.execute(
        "INSERT INTO profiles (profileId, name) VALUES (?1, ?2)
         ON CONFLICT (profileId) DO UPDATE SET name = excluded.name",
        params![profile.profile_id, profile.name],
    )?;
    Ok(())
}

fn parse_column<T: FromStr>(column: &'static str, value: String) -> Result<T> {
    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(AxeError::Column { column, value }),
    }
}

fn match_from_row(row: MatchRow) -> Result<Match> {
    let (season_id, week_id, match_id, opponent_id, score, outcome, status) = row;
    Ok(Match {
        season_id,
        week_id,
        match_id,
        opponent_id,
        score,
        outcome: parse_column("matches.outcome", outcome)?,
        status: parse_column("matches.status", status)?,
    })
}

fn read_match_row(row: &rusqlite::Row) -> rusqlite::Result<MatchRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

impl ScoreStore for SqliteScoreStore {
    fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        upsert_profile(&self.conn, profile)
    }

    fn upsert_season(&self, season: &Season) -> Result<()> {
        self.conn.execute(
            "INSERT INTO seasons (seasonId, name, year, ruleset, seasonRank, playoffRank)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (seasonId) DO UPDATE SET
                name = excluded.name,
                year = excluded.year,
                ruleset = excluded.ruleset,
                seasonRank = excluded.seasonRank,
                playoffRank = excluded.playoffRank",
            params![
                season.season_id,
                season.name,
                season.year,
                season.ruleset.to_string(),
                season.season_rank,
                season.playoff_rank,
            ],
        )?;
        Ok(())
    }

    fn upsert_discovered_match(&self, discovered: &Match) -> Result<()> {
        self.conn.execute(
            "INSERT INTO matches (seasonId, weekId, matchId, opponentId, score, outcome, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT (matchId) DO UPDATE SET
                seasonId = excluded.seasonId,
                weekId = excluded.weekId",
            params![
                discovered.season_id,
                discovered.week_id,
                discovered.match_id,
                discovered.opponent_id,
                discovered.score,
                discovered.outcome.to_string(),
                discovered.status.to_string(),
            ],
        )?;
        Ok(())
    }

    fn matches_with_status(&self, statuses: &[MatchStatus]) -> Result<Vec<Match>> {
        let placeholders = vec!["?"; statuses.len()].join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE status IN ({placeholders}) ORDER BY matchId"
        ))?;
        let rows = stmt
            .query_map(
                params_from_iter(statuses.iter().map(|s| s.to_string())),
                read_match_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(match_from_row).collect()
    }

    fn record_resolution(&self, resolution: &MatchResolution) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        for profile in resolution.profile.iter().chain(resolution.opponent.iter()) {
            upsert_profile(&tx, profile)?;
        }

        let updated = tx.execute(
            "UPDATE matches SET
                status = ?2,
                outcome = ?3,
                opponentId = COALESCE(?4, opponentId),
                score = COALESCE(?5, score)
             WHERE matchId = ?1",
            params![
                resolution.match_id,
                resolution.status.to_string(),
                resolution.outcome.to_string(),
                resolution.opponent.as_ref().map(|o| o.profile_id),
                resolution.score,
            ],
        )?;
        if updated != 1 {
            return Err(AxeError::UnknownMatch {
                match_id: resolution.match_id,
            });
        }

        {
            let mut round_stmt = tx.prepare_cached(
                "INSERT INTO rounds (matchId, roundId, outcome, score) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (matchId, roundId) DO UPDATE SET
                    outcome = excluded.outcome,
                    score = excluded.score",
            )?;
            for round in &resolution.rounds {
                round_stmt.execute(params![
                    round.match_id,
                    round.round_id,
                    round.outcome.map(|o| o.to_string()),
                    round.score,
                ])?;
            }

            let mut throw_stmt = tx.prepare_cached(
                "INSERT INTO throws (matchId, roundId, throwId, tool, target, score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (matchId, roundId, throwId) DO UPDATE SET
                    tool = excluded.tool,
                    target = excluded.target,
                    score = excluded.score",
            )?;
            for throw in &resolution.throws {
                throw_stmt.execute(params![
                    throw.match_id,
                    throw.round_id,
                    throw.throw_id,
                    throw.tool.to_string(),
                    throw.target.to_string(),
                    throw.score,
                ])?;
            }
        }

        tx.commit()?;
        debug!(
            match_id = resolution.match_id,
            status = %resolution.status,
            rounds = resolution.rounds.len(),
            throws = resolution.throws.len(),
            "recorded match"
        );
        Ok(())
    }

    fn profile(&self, profile_id: u32) -> Result<Option<Profile>> {
        let profile = self
            .conn
            .query_row(
                "SELECT profileId, name FROM profiles WHERE profileId = ?1",
                params![profile_id],
                |row| {
                    Ok(Profile {
                        profile_id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    fn profiles(&self) -> Result<Vec<Profile>> {
        let mut stmt = self
            .conn
            .prepare("SELECT profileId, name FROM profiles ORDER BY profileId")?;
        let profiles = stmt
            .query_map([], |row| {
                Ok(Profile {
                    profile_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(profiles)
    }

    fn seasons(&self) -> Result<Vec<Season>> {
        let mut stmt = self.conn.prepare(
            "SELECT seasonId, year, ruleset, name, seasonRank, playoffRank
             FROM seasons ORDER BY seasonId",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, u32>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(season_id, year, ruleset, name, season_rank, playoff_rank)| {
                Ok(Season {
                    season_id,
                    year,
                    ruleset: parse_column("seasons.ruleset", ruleset)?,
                    name,
                    season_rank,
                    playoff_rank,
                })
            })
            .collect()
    }

    fn matches(&self) -> Result<Vec<Match>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY matchId"))?;
        let rows = stmt
            .query_map([], read_match_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(match_from_row).collect()
    }

    fn rounds(&self) -> Result<Vec<Round>> {
        let mut stmt = self.conn.prepare(
            "SELECT matchId, roundId, outcome, score FROM rounds ORDER BY matchId, roundId",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, u8>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, u32>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(match_id, round_id, outcome, score)| {
                Ok(Round {
                    match_id,
                    round_id,
                    outcome: outcome
                        .map(|o| parse_column("rounds.outcome", o))
                        .transpose()?,
                    score,
                })
            })
            .collect()
    }

    fn throws(&self) -> Result<Vec<Throw>> {
        let mut stmt = self.conn.prepare(
            "SELECT matchId, roundId, throwId, tool, target, score
             FROM throws ORDER BY matchId, roundId, throwId",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, u8>(1)?,
                    row.get::<_, u8>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, u32>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(match_id, round_id, throw_id, tool, target, score)| {
                Ok(Throw {
                    match_id,
                    round_id,
                    throw_id,
                    tool: parse_column("throws.tool", tool)?,
                    target: parse_column("throws.target", target)?,
                    score,
                })
            })
            .collect()
    }

    fn table_counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            profiles: self.count("profiles")?,
            seasons: self.count("seasons")?,
            matches: self.count("matches")?,
            rounds: self.count("rounds")?,
            throws: self.count("throws")?,
        })
    }
}
