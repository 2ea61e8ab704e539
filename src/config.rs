use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const APP_DIR: &str = "owid-launcher";

/// An application that target URLs can be opened in.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Browser {
    pub name: String,
    pub app: String,
}

/// Everything the pipeline needs to know about the outside world.
///
/// Built once in `main` and passed by reference to every component, so
/// tests can point the clients at a local mock server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub live_origin: String,
    pub admin_origin: String,
    pub local_origin: String,
    pub local_agent_origin: String,
    pub staging_prefix: String,
    pub default_slug: String,
    pub datasette_url: String,
    pub github_api_url: String,
    pub github_repo: String,
    pub github_author: Option<String>,
    pub metadata_api_url: String,
    pub search_api_url: String,
    pub primary_browser: Browser,
    pub secondary_browser: Browser,
    pub data_dir: Option<PathBuf>,
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            live_origin: "https://ourworldindata.org".into(),
            admin_origin: "https://admin.owid.io".into(),
            local_origin: "http://localhost:3030".into(),
            local_agent_origin: "http://127.0.0.1:3030".into(),
            staging_prefix: "http://staging-site-".into(),
            default_slug: "life-expectancy".into(),
            datasette_url: "https://datasette-public.owid.io/owid.json".into(),
            github_api_url: "https://api.github.com".into(),
            github_repo: "owid/owid-grapher".into(),
            github_author: None,
            metadata_api_url: "https://api.ourworldindata.org/v1/indicators".into(),
            search_api_url: "https://ourworldindata.org/api/search".into(),
            primary_browser: Browser {
                name: "Google Chrome".into(),
                app: "/Applications/Google Chrome.app".into(),
            },
            secondary_browser: Browser {
                name: "Little Arc".into(),
                app: "/Applications/Arc.app".into(),
            },
            data_dir: None,
            http_timeout_secs: 15,
        }
    }
}

impl Settings {
    /// Defaults, then `<config_dir>/owid-launcher/config.toml`, then `OWID_*` env vars.
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(dir) = dirs::config_dir() {
            let file = dir.join(APP_DIR).join("config.toml");
            builder = builder.add_source(config::File::from(file).required(false));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("OWID"))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize::<Settings>()
            .context("Invalid configuration")?;
        Ok(settings)
    }

    /// Whether a copied URL's origin is one this tool knows. Staging hosts
    /// vary per branch, so only they are matched by prefix.
    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        [
            self.live_origin.as_str(),
            self.admin_origin.as_str(),
            self.local_origin.as_str(),
            self.local_agent_origin.as_str(),
        ]
        .contains(&origin)
            || origin.starts_with(self.staging_prefix.as_str())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
        })
    }

    pub fn charts_path(&self) -> PathBuf {
        self.data_dir().join("charts.json")
    }

    pub fn frecency_path(&self) -> PathBuf {
        self.data_dir().join("frecency.json")
    }
}
