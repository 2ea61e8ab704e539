use serde::Serialize;

use crate::extract::{Candidate, CandidateKind};

/// The single resolved target everything downstream consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReference {
    pub slug: Option<String>,
    pub chart_id: Option<u64>,
    pub pathname: Option<String>,
    pub query_params: Option<String>,
    pub is_admin_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_config: Option<serde_json::Value>,
}

impl PageReference {
    pub fn is_empty(&self) -> bool {
        self.slug.is_none() && self.chart_id.is_none() && self.pathname.is_none()
    }

    /// Write the fields `candidate`'s kind is responsible for.
    fn overlay(&mut self, candidate: &Candidate) {
        match candidate.kind {
            CandidateKind::FullUrl => {
                self.pathname = candidate.pathname.clone();
                self.query_params = candidate.query_params.clone();
                self.is_admin_page = candidate.is_admin_page;
                if candidate.slug.is_some() {
                    self.slug = candidate.slug.clone();
                }
                if candidate.chart_id.is_some() {
                    self.chart_id = candidate.chart_id;
                }
            }
            CandidateKind::SvgFilename | CandidateKind::PlainSlug => {
                self.slug = candidate.slug.clone();
                self.pathname = candidate.pathname.clone();
                self.query_params = candidate.query_params.clone();
            }
            CandidateKind::ChartId => {
                self.chart_id = candidate.chart_id;
                if candidate.slug.is_some() {
                    self.slug = candidate.slug.clone();
                    self.pathname = candidate.pathname.clone();
                }
                self.query_params = candidate.query_params.clone();
            }
        }
    }
}

/// Fold candidates into one reference, lowest precedence first.
///
/// Input order does not matter; only `CandidateKind` decides who wins.
pub fn merge(candidates: &[Candidate]) -> PageReference {
    let mut ordered: Vec<&Candidate> = candidates.iter().collect();
    ordered.sort_by_key(|c| c.kind);

    let mut reference = PageReference::default();
    for candidate in ordered {
        reference.overlay(candidate);
    }
    reference
}

/// `origin + pathname + ?query`, skipping absent parts.
pub fn make_url(origin: &str, pathname: Option<&str>, query_params: Option<&str>) -> String {
    let mut url = format!("{}{}", origin, pathname.unwrap_or(""));
    if let Some(query) = query_params.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url_candidate() -> Candidate {
        Candidate {
            kind: CandidateKind::FullUrl,
            slug: Some("life-expectancy".into()),
            query_params: Some("tab=chart".into()),
            chart_id: None,
            pathname: Some("/grapher/life-expectancy".into()),
            is_admin_page: false,
        }
    }

    #[test]
    fn url_candidate_alone() {
        let r = merge(&[url_candidate()]);
        assert_eq!(r.slug.as_deref(), Some("life-expectancy"));
        assert_eq!(r.pathname.as_deref(), Some("/grapher/life-expectancy"));
        assert_eq!(r.query_params.as_deref(), Some("tab=chart"));
        assert!(!r.is_admin_page);
        assert_eq!(r.chart_config, None);
    }

    #[test]
    fn filename_beats_url_regardless_of_input_order() {
        let svg = Candidate::grapher(CandidateKind::SvgFilename, "population", None);
        for input in [vec![url_candidate(), svg.clone()], vec![svg.clone(), url_candidate()]] {
            let r = merge(&input);
            assert_eq!(r.slug.as_deref(), Some("population"));
            assert_eq!(r.pathname.as_deref(), Some("/grapher/population"));
            assert_eq!(r.query_params, None);
        }
    }

    #[test]
    fn confirmed_chart_id_beats_numeric_slug() {
        let numeric = Candidate::grapher(CandidateKind::PlainSlug, "42", None);
        let by_id = Candidate {
            chart_id: Some(42),
            ..Candidate::grapher(CandidateKind::ChartId, "child-mortality", None)
        };
        let r = merge(&[by_id, numeric]);
        assert_eq!(r.chart_id, Some(42));
        assert_eq!(r.slug.as_deref(), Some("child-mortality"));
        assert_eq!(r.pathname.as_deref(), Some("/grapher/child-mortality"));
    }

    #[test]
    fn admin_url_keeps_admin_flag_through_later_overlays() {
        let admin = Candidate {
            kind: CandidateKind::FullUrl,
            slug: None,
            query_params: None,
            chart_id: Some(7),
            pathname: Some("/admin/charts/7/edit".into()),
            is_admin_page: true,
        };
        let r = merge(&[admin]);
        assert!(r.is_admin_page);
        assert_eq!(r.chart_id, Some(7));
        assert_eq!(r.slug, None);
    }

    #[test]
    fn nothing_merges_to_empty() {
        assert!(merge(&[]).is_empty());
    }

    #[test]
    fn make_url_skips_missing_parts() {
        assert_eq!(make_url("https://a.org", None, None), "https://a.org");
        assert_eq!(make_url("https://a.org", Some("/grapher/x"), Some("")), "https://a.org/grapher/x");
        assert_eq!(
            make_url("http://localhost:3030", Some("/grapher/x"), Some("tab=map")),
            "http://localhost:3030/grapher/x?tab=map"
        );
    }
}
