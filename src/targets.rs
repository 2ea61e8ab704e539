use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::datasette::{RandomChart, Variable};
use crate::extract::grapher_path;
use crate::github::StagingSite;
use crate::reference::{make_url, PageReference};

#[derive(Debug, Clone, PartialEq)]
pub enum TargetKind {
    Live,
    Local,
    Staging {
        branch: String,
        title: String,
        updated_at: DateTime<Utc>,
    },
}

/// One environment the resolved page can be opened in.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentTarget {
    pub kind: TargetKind,
    pub origin: String,
    /// Where admin pages live for this environment.
    pub admin_origin: String,
}

/// A titled link offered next to a target.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedLink {
    pub title: String,
    pub url: String,
}

impl EnvironmentTarget {
    pub fn live(settings: &Settings) -> Self {
        Self {
            kind: TargetKind::Live,
            origin: settings.live_origin.clone(),
            admin_origin: settings.admin_origin.clone(),
        }
    }

    pub fn local(settings: &Settings) -> Self {
        Self {
            kind: TargetKind::Local,
            origin: settings.local_origin.clone(),
            admin_origin: settings.local_origin.clone(),
        }
    }

    pub fn staging(site: &StagingSite) -> Self {
        Self {
            kind: TargetKind::Staging {
                branch: site.branch.clone(),
                title: site.title.clone(),
                updated_at: site.updated_at,
            },
            origin: site.staging_url.clone(),
            admin_origin: site.staging_url.clone(),
        }
    }

    /// Live, local, then one per staging site in the given order.
    pub fn all(settings: &Settings, sites: &[StagingSite]) -> Vec<Self> {
        let mut targets = vec![Self::live(settings), Self::local(settings)];
        targets.extend(sites.iter().map(Self::staging));
        targets
    }

    pub fn label(&self) -> &str {
        match &self.kind {
            TargetKind::Live => "Live",
            TargetKind::Local => "Local",
            TargetKind::Staging { branch, .. } => branch.as_str(),
        }
    }

    pub fn branch(&self) -> Option<&str> {
        match &self.kind {
            TargetKind::Staging { branch, .. } => Some(branch.as_str()),
            _ => None,
        }
    }

    /// Does `name` select this target on the command line?
    pub fn matches(&self, name: &str) -> bool {
        self.label().eq_ignore_ascii_case(name) || self.origin == name
    }

    pub fn url(&self, reference: &PageReference) -> String {
        let origin = if reference.is_admin_page { &self.admin_origin } else { &self.origin };
        make_url(
            origin,
            reference.pathname.as_deref(),
            reference.query_params.as_deref(),
        )
    }

    pub fn chart_url(&self, slug: &str) -> String {
        make_url(&self.origin, Some(&grapher_path(slug)), None)
    }

    pub fn editor_url(&self, reference: &PageReference) -> Option<String> {
        if reference.is_admin_page {
            return None;
        }
        let id = reference.chart_id?;
        Some(make_url(
            &self.admin_origin,
            Some(&format!("/admin/charts/{}/edit", id)),
            None,
        ))
    }

    pub fn grapher_page_url(&self, reference: &PageReference) -> Option<String> {
        if !reference.is_admin_page {
            return None;
        }
        reference.slug.as_deref().map(|slug| self.chart_url(slug))
    }

    /// Related pages, example charts, one random chart per type, and indicator
    /// metadata for this target.
    pub fn related_links(
        &self,
        reference: &PageReference,
        variables: &[Variable],
        random: &[RandomChart],
        settings: &Settings,
    ) -> Vec<RelatedLink> {
        let mut links = Vec::new();
        if let Some(url) = self.grapher_page_url(reference) {
            links.push(RelatedLink { title: "Open Grapher Page".into(), url });
        }
        if let Some(url) = self.editor_url(reference) {
            links.push(RelatedLink { title: "Open Chart Editor".into(), url });
        }
        links.push(RelatedLink {
            title: format!("Open {} Chart", title_case(&settings.default_slug)),
            url: self.chart_url(&settings.default_slug),
        });
        links.extend(random.iter().map(|chart| RelatedLink {
            title: format!("Open Random {}", chart.chart_type.name()),
            url: self.chart_url(&chart.slug),
        }));
        links.extend(variables.iter().map(|v| RelatedLink {
            title: format!("Metadata: {}", v.name),
            url: metadata_url(settings, v.id),
        }));
        links
    }
}

/// Path and query of a copied URL, to be replayed on another origin.
/// Anything that is not a URL contributes nothing.
pub fn path_suffix(text: &str) -> String {
    match url::Url::parse(text.trim()) {
        Ok(url) => make_url("", Some(url.path()), url.query()),
        Err(_) => String::new(),
    }
}

pub fn metadata_url(settings: &Settings, variable_id: u64) -> String {
    format!("{}/{}.metadata.json", settings.metadata_api_url, variable_id)
}

fn title_case(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_type::ChartType;

    fn grapher_ref() -> PageReference {
        PageReference {
            slug: Some("life-expectancy".into()),
            chart_id: Some(1234),
            pathname: Some("/grapher/life-expectancy".into()),
            query_params: Some("tab=chart".into()),
            ..PageReference::default()
        }
    }

    fn admin_ref() -> PageReference {
        PageReference {
            slug: Some("child-mortality".into()),
            chart_id: Some(42),
            pathname: Some("/admin/charts/42/edit".into()),
            is_admin_page: true,
            ..PageReference::default()
        }
    }

    fn site() -> StagingSite {
        StagingSite {
            title: "Fix tooltip".into(),
            branch: "fix-tooltip".into(),
            updated_at: "2026-10-15T09:12:44Z".parse().unwrap(),
            staging_url: "http://staging-site-fix-tooltip".into(),
        }
    }

    #[test]
    fn urls_per_environment() {
        let settings = Settings::default();
        let targets = EnvironmentTarget::all(&settings, &[site()]);
        let urls: Vec<String> = targets.iter().map(|t| t.url(&grapher_ref())).collect();
        assert_eq!(
            urls,
            vec![
                "https://ourworldindata.org/grapher/life-expectancy?tab=chart",
                "http://localhost:3030/grapher/life-expectancy?tab=chart",
                "http://staging-site-fix-tooltip/grapher/life-expectancy?tab=chart",
            ]
        );
    }

    #[test]
    fn live_admin_pages_use_admin_origin() {
        let live = EnvironmentTarget::live(&Settings::default());
        assert_eq!(live.url(&admin_ref()), "https://admin.owid.io/admin/charts/42/edit");
        assert_eq!(
            live.grapher_page_url(&admin_ref()).as_deref(),
            Some("https://ourworldindata.org/grapher/child-mortality")
        );
        assert_eq!(live.editor_url(&admin_ref()), None);
    }

    #[test]
    fn editor_url_needs_chart_id() {
        let settings = Settings::default();
        let live = EnvironmentTarget::live(&settings);
        let local = EnvironmentTarget::local(&settings);
        assert_eq!(
            live.editor_url(&grapher_ref()).as_deref(),
            Some("https://admin.owid.io/admin/charts/1234/edit")
        );
        assert_eq!(
            local.editor_url(&grapher_ref()).as_deref(),
            Some("http://localhost:3030/admin/charts/1234/edit")
        );
        let no_id = PageReference { chart_id: None, ..grapher_ref() };
        assert_eq!(live.editor_url(&no_id), None);
    }

    #[test]
    fn path_suffix_keeps_path_and_query() {
        assert_eq!(
            path_suffix("https://ourworldindata.org/grapher/gdp?tab=map\n"),
            "/grapher/gdp?tab=map"
        );
        assert_eq!(path_suffix("http://localhost:3030/admin/charts"), "/admin/charts");
        assert_eq!(path_suffix("gdp"), "");
    }

    #[test]
    fn selecting_targets_by_name() {
        let staging = EnvironmentTarget::staging(&site());
        assert!(staging.matches("fix-tooltip"));
        assert!(staging.matches("http://staging-site-fix-tooltip"));
        assert!(EnvironmentTarget::live(&Settings::default()).matches("live"));
        assert!(!staging.matches("live"));
    }

    #[test]
    fn related_links_for_a_grapher_page() {
        let settings = Settings::default();
        let local = EnvironmentTarget::local(&settings);
        let random = vec![
            RandomChart {
                slug: "life-expectancy-vs-gdp".into(),
                chart_type: ChartType::ScatterPlot,
            },
            RandomChart {
                slug: "share-of-land-area".into(),
                chart_type: ChartType::Marimekko,
            },
        ];
        let variables = vec![Variable { id: 1001, name: "Under-five mortality".into() }];
        let links = local.related_links(&grapher_ref(), &variables, &random, &settings);
        let titles: Vec<&str> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Open Chart Editor",
                "Open Life Expectancy Chart",
                "Open Random Scatter Plot",
                "Open Random Marimekko Chart",
                "Metadata: Under-five mortality",
            ]
        );
        assert_eq!(
            links[4].url,
            "https://api.ourworldindata.org/v1/indicators/1001.metadata.json"
        );
        assert_eq!(links[3].url, "http://localhost:3030/grapher/share-of-land-area");
    }

    #[test]
    fn no_random_charts_means_no_random_links() {
        let settings = Settings::default();
        let live = EnvironmentTarget::live(&settings);
        let links = live.related_links(&admin_ref(), &[], &[], &settings);
        let titles: Vec<&str> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Open Grapher Page", "Open Life Expectancy Chart"]);
    }
}
