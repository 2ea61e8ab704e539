use serde::Deserialize;
use tracing::warn;

use crate::config::Settings;
use crate::http;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// Full-text search over published charts and articles.
pub async fn search(client: &reqwest::Client, settings: &Settings, query: &str) -> Vec<SearchResult> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    match http::get_json::<SearchResponse>(client, &settings.search_api_url, &[("q", query)]).await {
        Ok(response) => response.results,
        Err(e) => {
            warn!("Search for {:?} failed: {:#}", query, e);
            Vec::new()
        }
    }
}
