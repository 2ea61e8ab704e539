//! Visit-based ordering for staging sites: frequently and recently opened
//! branches float to the top, the rest keep the order GitHub returned.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const HALF_LIFE_HOURS: f64 = 24.0 * 7.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Visit {
    count: u32,
    last_visited: DateTime<Utc>,
}

impl Visit {
    fn score(&self, now: DateTime<Utc>) -> f64 {
        let age_hours = (now - self.last_visited).num_minutes().max(0) as f64 / 60.0;
        self.count as f64 * 0.5f64.powf(age_hours / HALF_LIFE_HOURS)
    }
}

pub struct Frecency {
    path: PathBuf,
    visits: HashMap<String, Visit>,
}

impl Frecency {
    /// A missing or unreadable file just means no history.
    pub fn load(path: &Path) -> Self {
        let visits = match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable visit history {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self {
            path: path.to_path_buf(),
            visits,
        }
    }

    pub fn record(&mut self, key: &str, now: DateTime<Utc>) -> Result<()> {
        let visit = self.visits.entry(key.to_string()).or_insert(Visit {
            count: 0,
            last_visited: now,
        });
        visit.count += 1;
        visit.last_visited = now;
        debug!("Recorded visit to {} ({} total)", key, visit.count);
        self.persist()
    }

    /// Stable: visited items by descending score, then unvisited in input order.
    pub fn sort<T, F>(&self, mut items: Vec<T>, key: F, now: DateTime<Utc>) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        items.sort_by(|a, b| {
            let sa = self.visits.get(key(a)).map(|v| v.score(now));
            let sb = self.visits.get(key(b)).map(|v| v.score(now));
            match (sa, sb) {
                (Some(x), Some(y)) => y.total_cmp(&x),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
        });
        items
    }

    fn persist(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.visits)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
