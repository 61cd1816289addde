use tracing::instrument;

use crate::config::{Config, DEFAULT_BASE_URL};
use crate::error::{AxeError, Result};
use crate::model::{RawMatch, RawProfile};
use crate::scorer;

/// Where the pipeline gets its raw payloads from.
#[allow(async_fn_in_trait)]
pub trait MatchSource {
    /// Profile listing with every season and match of the player.
    async fn get_profile(&self, profile_id: u32) -> Result<RawProfile>;

    /// Raw payload of one match as seen by the tracked player.
    async fn get_match(&self, profile_id: u32, match_id: u32) -> Result<RawMatch>;
}

/// The main entry point for talking to the scoring site.
///
/// `ScorerClient` wraps a [`reqwest::Client`] and exposes methods to fetch
/// profile listings and match payloads.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> axe_stats::Result<()> {
/// use axe_stats::ScorerClient;
///
/// let client = ScorerClient::new();
/// let profile = client.get_profile(1207260).await?;
/// println!("Found {} seasons", profile.leagues.len());
/// # Ok(())
/// # }
/// ```
pub struct ScorerClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScorerClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a client with the timeout, user agent and base URL of `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AxeError::Http {
                url: config.base_url.clone(),
                source: e,
            })?;
        Ok(Self::with_client(http, &config.base_url))
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure proxies, headers, etc.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            http: client,
            base_url: base_url.to_string(),
        }
    }

    /// Fetch the season and match listing of a player.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, profile_id: u32) -> Result<RawProfile> {
        scorer::profile::get_profile(&self.http, &self.base_url, profile_id).await
    }

    /// Fetch the raw payload of one match.
    #[instrument(skip(self))]
    pub async fn get_match(&self, profile_id: u32, match_id: u32) -> Result<RawMatch> {
        scorer::match_detail::get_match(&self.http, &self.base_url, profile_id, match_id).await
    }
}

impl Default for ScorerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchSource for ScorerClient {
    async fn get_profile(&self, profile_id: u32) -> Result<RawProfile> {
        ScorerClient::get_profile(self, profile_id).await
    }

    async fn get_match(&self, profile_id: u32, match_id: u32) -> Result<RawMatch> {
        ScorerClient::get_match(self, profile_id, match_id).await
    }
}
