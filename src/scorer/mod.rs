pub(crate) mod match_detail;
pub(crate) mod profile;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{AxeError, Result};

/// Fetch a URL and decode the response body as JSON.
pub(crate) async fn get_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    debug!(url, "fetching payload");

    let response = client.get(url).send().await.map_err(|e| AxeError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AxeError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    let body = response.text().await.map_err(|e| AxeError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })?;

    decode(url, &body)
}

pub(crate) fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| AxeError::Decode {
        url: url.to_owned(),
        source: e,
    })
}

/// Join `path` onto the API base, tolerating a trailing slash on the base.
pub(crate) fn api_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
