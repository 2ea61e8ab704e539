//! Read-only chart metadata lookups against the public Datasette instance.
//!
//! Every public lookup degrades to "nothing found" on failure; the error is
//! logged and never reaches the caller.

use anyhow::{bail, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::chart_type::ChartType;
use crate::config::Settings;
use crate::http;

#[derive(Deserialize)]
struct QueryResponse<T> {
    ok: bool,
    #[serde(default = "Vec::new")]
    rows: Vec<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartRecord {
    pub id: u64,
    pub slug: String,
    pub config: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RandomChart {
    pub slug: String,
    pub chart_type: ChartType,
}

#[derive(Clone)]
pub struct DatasetteClient {
    http: reqwest::Client,
    url: String,
}

impl DatasetteClient {
    pub fn new(http: reqwest::Client, settings: &Settings) -> Self {
        Self {
            http,
            url: settings.datasette_url.clone(),
        }
    }

    /// Run `sql` and return its rows. `ttl = Some(0)` bypasses the server cache.
    async fn query<T: DeserializeOwned>(&self, sql: &str, ttl: Option<u32>) -> Result<Vec<T>> {
        let ttl = ttl.map(|t| t.to_string());
        let mut params = vec![("sql", sql)];
        if let Some(ttl) = ttl.as_deref() {
            params.push(("_ttl", ttl));
        }
        debug!("datasette query: {}", sql);
        let response: QueryResponse<T> = http::get_json(&self.http, &self.url, &params).await?;
        if !response.ok {
            bail!("datasette reported a failed query");
        }
        Ok(response.rows)
    }

    /// The slug, if a chart with exactly this slug exists.
    pub async fn validate_slug(&self, candidate: &str) -> Option<String> {
        match self.query::<(u64, String)>(&validate_slug_sql(candidate), None).await {
            Ok(rows) => rows.into_iter().next().map(|(_, slug)| slug),
            Err(e) => {
                warn!("validate_slug({}) failed: {:#}", candidate, e);
                None
            }
        }
    }

    /// The chart matching `slug` or `chart_id`. Without either, no query is sent.
    pub async fn fetch_chart(&self, slug: Option<&str>, chart_id: Option<u64>) -> Option<ChartRecord> {
        let sql = chart_sql(slug, chart_id)?;
        let rows = match self.query::<(u64, String, Option<String>)>(&sql, None).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("fetch_chart(slug={:?}, id={:?}) failed: {:#}", slug, chart_id, e);
                return None;
            }
        };
        let (id, slug, raw_config) = rows.into_iter().next()?;
        let config = raw_config.and_then(|raw| match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Chart {} has an unreadable config: {}", id, e);
                None
            }
        });
        Some(ChartRecord { id, slug, config })
    }

    /// Indicators plotted by a chart, preferring their display names.
    pub async fn fetch_variables(&self, chart_id: u64) -> Vec<Variable> {
        if chart_id == 0 {
            return Vec::new();
        }
        match self
            .query::<(u64, String, Option<String>)>(&variables_sql(chart_id), None)
            .await
        {
            Ok(rows) => rows
                .into_iter()
                .map(|(id, name, display_name)| Variable {
                    id,
                    name: display_name.filter(|d| !d.is_empty()).unwrap_or(name),
                })
                .collect(),
            Err(e) => {
                warn!("fetch_variables({}) failed: {:#}", chart_id, e);
                Vec::new()
            }
        }
    }

    /// One random chart per chart type. Always bypasses the cache.
    pub async fn fetch_random_charts(&self) -> Vec<RandomChart> {
        match self.query::<(String, String)>(&random_charts_sql(), Some(0)).await {
            Ok(rows) => rows
                .into_iter()
                .filter_map(|(slug, kind)| {
                    let chart_type = ChartType::parse(&kind)?;
                    Some(RandomChart { slug, chart_type })
                })
                .collect(),
            Err(e) => {
                warn!("fetch_random_charts failed: {:#}", e);
                Vec::new()
            }
        }
    }
}

fn quote(literal: &str) -> String {
    format!("'{}'", literal.replace('\'', "''"))
}

pub(crate) fn validate_slug_sql(slug: &str) -> String {
    format!("select id, slug from charts where slug = {}", quote(slug))
}

pub(crate) fn chart_sql(slug: Option<&str>, chart_id: Option<u64>) -> Option<String> {
    let mut clauses = Vec::new();
    if let Some(slug) = slug.filter(|s| !s.is_empty()) {
        clauses.push(format!("slug = {}", quote(slug)));
    }
    if let Some(id) = chart_id.filter(|id| *id != 0) {
        clauses.push(format!("id = {}", id));
    }
    if clauses.is_empty() {
        return None;
    }
    Some(format!(
        "select id, slug, config from charts where {} limit 1",
        clauses.join(" or ")
    ))
}

pub(crate) fn variables_sql(chart_id: u64) -> String {
    format!(
        "select cd.variableId, v.name, v.display ->> 'name' as displayName \
         from chart_dimensions cd \
         join charts c on c.id = cd.chartId \
         join variables v on v.id = cd.variableId \
         where c.id = {}",
        chart_id
    )
}

pub(crate) fn random_charts_sql() -> String {
    let types = ChartType::GRAPHER
        .iter()
        .map(|t| quote(t.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "with randomRows as ( \
           select slug, type, row_number() over (partition by type order by random()) as rn \
           from charts \
           where type in ({}) \
             and json_extract(configWithDefaults, '$.hasChartTab') is not false \
         ) \
         select slug, type from randomRows where rn = 1 limit {}",
        types,
        ChartType::GRAPHER.len()
    )
}
