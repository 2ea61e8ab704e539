use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::{Candidate, CandidateKind};
use crate::config::Settings;

static GRAPHER_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/grapher/(?P<slug>.+)$").unwrap());
static ADMIN_CHART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/admin/charts/(?P<id>\d+)").unwrap());

/// Outcome of reading clipboard text as a link.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlMatch {
    /// Not a syntactically valid absolute URL.
    NotAUrl,
    /// A URL, but not on one of the allowed origins.
    ForeignOrigin,
    Matched(Candidate),
}

pub fn classify_url(text: &str, settings: &Settings) -> UrlMatch {
    let Ok(url) = Url::parse(text) else {
        return UrlMatch::NotAUrl;
    };

    let origin = url.origin().ascii_serialization();
    if !settings.is_allowed_origin(&origin) {
        return UrlMatch::ForeignOrigin;
    }

    let pathname = url.path().to_string();
    let query_params = url.query().filter(|q| !q.is_empty()).map(str::to_string);

    let slug = GRAPHER_PATH_RE
        .captures(&pathname)
        .map(|caps| caps["slug"].to_string());
    // Ids too large for u64 are simply absent.
    let chart_id = ADMIN_CHART_RE
        .captures(&pathname)
        .and_then(|caps| caps["id"].parse::<u64>().ok());

    UrlMatch::Matched(Candidate {
        kind: CandidateKind::FullUrl,
        slug,
        query_params,
        chart_id,
        is_admin_page: pathname.starts_with("/admin"),
        pathname: Some(pathname),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(text: &str) -> Candidate {
        match classify_url(text, &Settings::default()) {
            UrlMatch::Matched(c) => c,
            other => panic!("expected a match for {text}, got {other:?}"),
        }
    }

    #[test]
    fn live_grapher_url() {
        let c = matched("https://ourworldindata.org/grapher/life-expectancy?tab=chart");
        assert_eq!(c.slug.as_deref(), Some("life-expectancy"));
        assert_eq!(c.pathname.as_deref(), Some("/grapher/life-expectancy"));
        assert_eq!(c.query_params.as_deref(), Some("tab=chart"));
        assert_eq!(c.chart_id, None);
        assert!(!c.is_admin_page);
    }

    #[test]
    fn grapher_slug_on_every_allowed_origin() {
        for origin in [
            "https://ourworldindata.org",
            "https://admin.owid.io",
            "http://localhost:3030",
            "http://127.0.0.1:3030",
            "http://staging-site-my-branch",
        ] {
            let c = matched(&format!("{origin}/grapher/population-density"));
            assert_eq!(c.slug.as_deref(), Some("population-density"), "{origin}");
            assert!(!c.is_admin_page, "{origin}");
        }
    }

    #[test]
    fn admin_chart_url_yields_chart_id() {
        let c = matched("https://admin.owid.io/admin/charts/5423/edit");
        assert!(c.is_admin_page);
        assert_eq!(c.chart_id, Some(5423));
        assert_eq!(c.slug, None);
        assert_eq!(c.query_params, None);
    }

    #[test]
    fn oversized_chart_id_is_absent() {
        let c = matched("https://admin.owid.io/admin/charts/99999999999999999999999/edit");
        assert!(c.is_admin_page);
        assert_eq!(c.chart_id, None);
    }

    #[test]
    fn non_grapher_page_keeps_path_without_slug() {
        let c = matched("https://ourworldindata.org/co2-and-greenhouse-gas-emissions");
        assert_eq!(c.slug, None);
        assert_eq!(c.pathname.as_deref(), Some("/co2-and-greenhouse-gas-emissions"));
    }

    #[test]
    fn bare_question_mark_is_no_query() {
        let c = matched("https://ourworldindata.org/grapher/gdp?");
        assert_eq!(c.query_params, None);
    }

    #[test]
    fn rejects_foreign_origins() {
        let settings = Settings::default();
        assert_eq!(
            classify_url("https://example.org/grapher/gdp", &settings),
            UrlMatch::ForeignOrigin
        );
        assert_eq!(
            classify_url("http://ourworldindata.org/grapher/gdp", &settings),
            UrlMatch::ForeignOrigin
        );
        assert_eq!(
            classify_url("https://ourworldindata.org.evil.example/grapher/gdp", &settings),
            UrlMatch::ForeignOrigin
        );
    }

    #[test]
    fn rejects_non_urls() {
        let settings = Settings::default();
        assert_eq!(classify_url("life-expectancy", &settings), UrlMatch::NotAUrl);
        assert_eq!(classify_url("svg/gdp_v1_x.svg", &settings), UrlMatch::NotAUrl);
        assert_eq!(classify_url("", &settings), UrlMatch::NotAUrl);
    }
}
