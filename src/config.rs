use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AxeError, Result};

pub const DEFAULT_PROFILE_ID: u32 = 1207260;
pub const DEFAULT_BASE_URL: &str = "https://api.axescores.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Runtime settings. Every key is optional in the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Player whose matches are scraped and rolled up.
    pub profile_id: u32,
    pub database_path: PathBuf,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Also reprocess matches previously rejected as invalid.
    pub retry_invalid: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_id: DEFAULT_PROFILE_ID,
            database_path: PathBuf::from("data/database.db"),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry_invalid: false,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| AxeError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AxeError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
