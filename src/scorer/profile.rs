use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::RawProfile;
use crate::scorer::{self, api_url};

#[instrument(skip(client, base_url))]
pub(crate) async fn get_profile(
    client: &reqwest::Client,
    base_url: &str,
    profile_id: u32,
) -> Result<RawProfile> {
    let url = api_url(base_url, &format!("player/{profile_id}"));
    let profile: RawProfile = scorer::get_json(client, &url).await?;
    debug!(
        profile_id,
        seasons = profile.leagues.len(),
        matches = profile
            .leagues
            .iter()
            .flat_map(|s| &s.weeks)
            .map(|w| w.matches.len())
            .sum::<usize>(),
        "fetched profile listing"
    );
    Ok(profile)
}
