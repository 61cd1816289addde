use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

/// Bumped whenever the statements below change shape.
pub(crate) const SCHEMA_VERSION: i64 = 1;

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS profiles (
    profileId INTEGER NOT NULL,
    name TEXT NOT NULL DEFAULT 'Unknown',

    PRIMARY KEY (profileId)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS seasons (
    seasonId INTEGER NOT NULL,
    name TEXT NOT NULL,
    year INTEGER NOT NULL DEFAULT 0,
    ruleset TEXT NOT NULL DEFAULT 'unknown',
    seasonRank INTEGER NOT NULL DEFAULT 0,
    playoffRank INTEGER NOT NULL DEFAULT 0,

    PRIMARY KEY (seasonId)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS matches (
    seasonId INTEGER NOT NULL,
    weekId INTEGER NOT NULL,
    matchId INTEGER NOT NULL,
    opponentId INTEGER NOT NULL DEFAULT 0,
    score INTEGER NOT NULL DEFAULT 0,
    outcome TEXT NOT NULL DEFAULT 'TBD',
    status TEXT NOT NULL DEFAULT 'new',

    PRIMARY KEY (matchId)
) WITHOUT ROWID;

CREATE INDEX IF NOT EXISTS idx_matches_status ON matches (status);

CREATE TABLE IF NOT EXISTS rounds (
    matchId INTEGER NOT NULL,
    roundId INTEGER NOT NULL,
    outcome TEXT,
    score INTEGER NOT NULL,

    PRIMARY KEY (matchId, roundId)
) WITHOUT ROWID;

CREATE TABLE IF NOT EXISTS throws (
    matchId INTEGER NOT NULL,
    roundId INTEGER NOT NULL,
    throwId INTEGER NOT NULL,
    tool TEXT NOT NULL,
    target TEXT NOT NULL,
    score INTEGER NOT NULL,

    PRIMARY KEY (matchId, roundId, throwId)
) WITHOUT ROWID;
";

/// Create any missing table and stamp the schema version.
pub(crate) fn create_if_needed(conn: &mut Connection) -> Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version >= SCHEMA_VERSION {
        return Ok(());
    }

    info!(from = db_version, to = SCHEMA_VERSION, "creating score db schema");
    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_TABLES)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}
