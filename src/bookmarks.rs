//! Hand-picked example charts, kept in a single JSON document.
//!
//! The whole file is read on load and rewritten on every mutation. There is
//! one writer (this process), so last write wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use url::Url;
use uuid::Uuid;

use crate::chart_type::ChartType;
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Explorer,
    Grapher,
}

impl PageType {
    pub fn for_url(url: &str) -> Self {
        if url.contains("/explorers/") {
            PageType::Explorer
        } else {
            PageType::Grapher
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageType::Explorer => "Explorer Page",
            PageType::Grapher => "Grapher Page",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart {
    pub id: String,
    pub chart_type: ChartType,
    pub tag_line: String,
    pub url: String,
    #[serde(rename = "type")]
    pub page_type: PageType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChartsFile {
    charts: Vec<Chart>,
}

/// User input for a new chart or an edit.
#[derive(Debug, Clone, Default)]
pub struct ChartFields {
    pub chart_type: Option<ChartType>,
    pub tag_line: Option<String>,
    pub url: Option<String>,
}

pub struct ChartStore {
    path: PathBuf,
    charts: Vec<Chart>,
}

impl ChartStore {
    /// Read the store. A missing file is an empty store; anything else is an error.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let charts = match std::fs::read_to_string(path) {
            Ok(raw) => {
                let file: ChartsFile = serde_json::from_str(&raw).map_err(|source| {
                    error!("Error reading {}: {}", path.display(), source);
                    StoreError::Json {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                file.charts
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                error!("Error reading {}: {}", path.display(), source);
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            charts,
        })
    }

    /// Newest first.
    pub fn list(&self) -> Vec<&Chart> {
        let mut charts: Vec<&Chart> = self.charts.iter().collect();
        charts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        charts
    }

    pub fn get(&self, id: &str) -> Option<&Chart> {
        self.charts.iter().find(|c| c.id == id)
    }

    pub fn create(
        &mut self,
        chart_type: ChartType,
        tag_line: &str,
        url: &str,
    ) -> Result<Chart, StoreError> {
        if self.charts.iter().any(|c| c.url == url) {
            return Err(StoreError::DuplicateUrl(url.to_string()));
        }
        let chart = Chart {
            id: Uuid::now_v7().to_string(),
            chart_type,
            tag_line: tag_line.to_string(),
            url: url.to_string(),
            page_type: PageType::for_url(url),
            created_at: Utc::now(),
        };
        self.charts.push(chart.clone());
        self.charts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.persist()?;
        info!("Saved chart {} ({})", chart.id, chart.url);
        Ok(chart)
    }

    /// Apply `fields` to an existing chart. Id and creation time never change.
    pub fn update(&mut self, id: &str, fields: ChartFields) -> Result<Chart, StoreError> {
        if let Some(url) = &fields.url {
            if self.charts.iter().any(|c| c.id != id && &c.url == url) {
                return Err(StoreError::DuplicateUrl(url.clone()));
            }
        }
        let index = self.index_of(id)?;
        let chart = &mut self.charts[index];
        if let Some(chart_type) = fields.chart_type {
            chart.chart_type = chart_type;
        }
        if let Some(tag_line) = fields.tag_line {
            chart.tag_line = tag_line;
        }
        if let Some(url) = fields.url {
            chart.page_type = PageType::for_url(&url);
            chart.url = url;
        }
        let updated = chart.clone();
        self.persist()?;
        info!("Updated chart {}", id);
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<Chart, StoreError> {
        let index = self.index_of(id)?;
        let removed = self.charts.remove(index);
        self.persist()?;
        info!("Deleted chart {}", id);
        Ok(removed)
    }

    fn index_of(&self, id: &str) -> Result<usize, StoreError> {
        self.charts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| {
            error!("Error writing {}: {}", self.path.display(), source);
            StoreError::Io {
                path: self.path.clone(),
                source,
            }
        };
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        let file = ChartsFile {
            charts: self.charts.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(io_err)
    }
}

/// Open Graph preview image for a chart page.
pub fn thumbnail_url(chart_url: &str) -> Option<String> {
    let mut url = Url::parse(chart_url).ok()?;
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "imType")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(others)
        .append_pair("imType", "og");
    let path = format!("{}.png", url.path());
    url.set_path(&path);
    Some(url.to_string())
}
