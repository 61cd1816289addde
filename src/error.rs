use std::path::PathBuf;

use crate::model::Target;

/// All errors that can occur while scraping, storing or aggregating match data.
#[derive(thiserror::Error, Debug)]
pub enum AxeError {
    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The response body was not shaped like the expected payload.
    #[error("failed to decode payload from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    /// The persistence layer rejected a statement.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error while preparing the database location.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored enum column holds text that no variant serializes to.
    #[error("unrecognized value {value:?} in column {column}")]
    Column { column: &'static str, value: String },

    /// A resolution was recorded for a match that was never discovered.
    #[error("match {match_id} is not in the database")]
    UnknownMatch { match_id: u32 },

    /// A throw score outside the bucket set of its target.
    #[error("illegal {target} throw score {score}")]
    IllegalThrowScore { target: Target, score: u32 },

    /// The configuration file could not be read or parsed.
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, AxeError>;
