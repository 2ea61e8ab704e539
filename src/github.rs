use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Settings;
use crate::http;

const STAGING_NAME_MAX: usize = 28;

#[derive(Debug, Deserialize)]
struct PullRequest {
    title: String,
    head: Head,
    user: User,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct Head {
    #[serde(rename = "ref")]
    branch: String,
}

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

/// An open pull request and the staging server built from its branch.
#[derive(Debug, Clone, PartialEq)]
pub struct StagingSite {
    pub title: String,
    pub branch: String,
    pub updated_at: DateTime<Utc>,
    pub staging_url: String,
}

#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    pulls_url: String,
    author: Option<String>,
    staging_prefix: String,
}

impl GithubClient {
    pub fn new(http: reqwest::Client, settings: &Settings) -> Self {
        Self {
            http,
            pulls_url: format!("{}/repos/{}/pulls", settings.github_api_url, settings.github_repo),
            author: settings.github_author.clone(),
            staging_prefix: settings.staging_prefix.clone(),
        }
    }

    /// Up to 100 open PRs, most recently updated first, optionally by one author.
    /// Failures yield an empty list.
    pub async fn list_pull_requests(&self) -> Vec<StagingSite> {
        match self.fetch().await {
            Ok(sites) => {
                info!("Found {} staging sites", sites.len());
                sites
            }
            Err(e) => {
                warn!("Listing pull requests failed: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<StagingSite>> {
        let pulls: Vec<PullRequest> = http::get_json(
            &self.http,
            &self.pulls_url,
            &[("per_page", "100"), ("sort", "updated"), ("direction", "desc")],
        )
        .await?;

        Ok(pulls
            .into_iter()
            .filter(|pr| match &self.author {
                Some(author) => &pr.user.login == author,
                None => true,
            })
            .map(|pr| StagingSite {
                staging_url: staging_url(&self.staging_prefix, &pr.head.branch),
                title: pr.title,
                branch: pr.head.branch,
                updated_at: pr.updated_at,
            })
            .collect())
    }
}

/// Staging hosts are named after the branch: slugified, cut to 28 characters.
pub fn staging_url(prefix: &str, branch: &str) -> String {
    let slug: String = branch
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' }
        })
        .take(STAGING_NAME_MAX)
        .collect();
    format!("{}{}", prefix, slug.trim_end_matches('-'))
}
