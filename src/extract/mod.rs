pub mod link;
pub mod plain;
pub mod svg;

use crate::config::Settings;

/// Where a candidate came from. The derived order is the merge precedence:
/// later kinds overwrite the fields produced by earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CandidateKind {
    FullUrl,
    SvgFilename,
    PlainSlug,
    ChartId,
}

/// One interpretation of the clipboard text.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub kind: CandidateKind,
    pub slug: Option<String>,
    pub query_params: Option<String>,
    pub chart_id: Option<u64>,
    pub pathname: Option<String>,
    pub is_admin_page: bool,
}

impl Candidate {
    pub fn new(kind: CandidateKind) -> Self {
        Self {
            kind,
            slug: None,
            query_params: None,
            chart_id: None,
            pathname: None,
            is_admin_page: false,
        }
    }

    /// A candidate pointing at `/grapher/<slug>`.
    pub fn grapher(kind: CandidateKind, slug: &str, query_params: Option<String>) -> Self {
        Self {
            slug: Some(slug.to_string()),
            pathname: Some(grapher_path(slug)),
            query_params,
            ..Self::new(kind)
        }
    }
}

pub fn grapher_path(slug: &str) -> String {
    format!("/grapher/{}", slug)
}

/// Every interpretation of `text`, in precedence order. Pure, no I/O.
///
/// Plain-slug and chart-id candidates are only staged here; the resolver
/// must confirm them before they can take part in a merge.
pub fn extract_candidates(text: &str, settings: &Settings) -> Vec<Candidate> {
    let text = text.trim();
    let mut candidates = Vec::new();

    if let link::UrlMatch::Matched(candidate) = link::classify_url(text, settings) {
        candidates.push(candidate);
    }
    if let Some(candidate) = svg::match_filename(text) {
        candidates.push(candidate);
    }
    candidates.extend(plain::stage(text));

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_ordered_by_precedence() {
        assert!(CandidateKind::FullUrl < CandidateKind::SvgFilename);
        assert!(CandidateKind::SvgFilename < CandidateKind::PlainSlug);
        assert!(CandidateKind::PlainSlug < CandidateKind::ChartId);
    }

    #[test]
    fn grapher_url_yields_only_a_url_candidate() {
        let settings = Settings::default();
        let c = extract_candidates(
            "  https://ourworldindata.org/grapher/life-expectancy?tab=chart\n",
            &settings,
        );
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].kind, CandidateKind::FullUrl);
        assert_eq!(c[0].slug.as_deref(), Some("life-expectancy"));
    }

    #[test]
    fn svg_filename_yields_a_filename_candidate() {
        let settings = Settings::default();
        let c = extract_candidates("svg/co2-emissions_v2_abcdef.svg", &settings);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].kind, CandidateKind::SvgFilename);
        assert_eq!(c[0].slug.as_deref(), Some("co2-emissions"));
    }

    #[test]
    fn numeric_text_is_staged_as_slug_and_chart_id() {
        let settings = Settings::default();
        let c = extract_candidates("42", &settings);
        let kinds: Vec<_> = c.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CandidateKind::PlainSlug, CandidateKind::ChartId]);
        assert_eq!(c[0].slug.as_deref(), Some("42"));
        assert_eq!(c[1].chart_id, Some(42));
    }

    #[test]
    fn foreign_url_yields_nothing() {
        let settings = Settings::default();
        assert!(extract_candidates("https://example.com/grapher/gdp", &settings).is_empty());
    }

    #[test]
    fn empty_text_yields_nothing() {
        let settings = Settings::default();
        assert!(extract_candidates("   ", &settings).is_empty());
    }
}
