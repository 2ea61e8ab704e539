use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::config::Settings;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared client for every remote lookup. GitHub rejects requests without a user agent.
pub fn build_client(settings: &Settings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(settings.http_timeout())
        .build()
        .context("Failed to build HTTP client")
}

/// GET `url` with `params` and decode a JSON body. Non-2xx is an error.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    params: &[(&str, &str)],
) -> Result<T> {
    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", url))?
        .error_for_status()?;
    response
        .json::<T>()
        .await
        .with_context(|| format!("Unexpected response body from {}", url))
}
