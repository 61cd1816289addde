use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::RawMatch;
use crate::scorer::{self, api_url};

pub(crate) fn match_url(base_url: &str, profile_id: u32, match_id: u32) -> String {
    api_url(base_url, &format!("player/{profile_id}/match/{match_id}"))
}

#[instrument(skip(client, base_url))]
pub(crate) async fn get_match(
    client: &reqwest::Client,
    base_url: &str,
    profile_id: u32,
    match_id: u32,
) -> Result<RawMatch> {
    let url = match_url(base_url, profile_id, match_id);
    let raw: RawMatch = scorer::get_json(client, &url).await?;
    debug!(
        match_id,
        players = raw.players.len(),
        rounds = raw.rounds.len(),
        "fetched match payload"
    );
    Ok(raw)
}
