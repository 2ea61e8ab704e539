use tracing::{debug, info};

use crate::config::Settings;
use crate::datasette::{ChartRecord, DatasetteClient};
use crate::extract::{self, Candidate, CandidateKind};
use crate::reference::{merge, PageReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Extracting,
    Resolving,
    Resolved,
    ResolvedWithFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub reference: PageReference,
    pub phase: Phase,
    /// Shown to the user when the default chart was substituted.
    pub notice: Option<String>,
}

/// Turns clipboard text into one `PageReference`.
///
/// Never fails: unparseable text and failed lookups only remove candidates.
#[derive(Clone)]
pub struct Resolver {
    datasette: DatasetteClient,
    settings: Settings,
}

impl Resolver {
    pub fn new(datasette: DatasetteClient, settings: &Settings) -> Self {
        Self {
            datasette,
            settings: settings.clone(),
        }
    }

    pub async fn resolve(&self, text: &str) -> Resolution {
        let text = text.trim();
        let mut phase = Phase::Idle;

        advance(&mut phase, Phase::Extracting);
        let staged = extract::extract_candidates(text, &self.settings);
        debug!("Staged {} candidates for {:?}", staged.len(), text);

        advance(&mut phase, Phase::Resolving);
        let plain = staged.iter().find(|c| c.kind == CandidateKind::PlainSlug);
        let by_id = staged.iter().find(|c| c.kind == CandidateKind::ChartId);

        // Both guesses are checked concurrently and merged only once both are back.
        let (confirmed_slug, id_record) = tokio::join!(
            async {
                match plain.and_then(|c| c.slug.as_deref()) {
                    Some(slug) => self.datasette.validate_slug(slug).await,
                    None => None,
                }
            },
            async {
                match by_id.and_then(|c| c.chart_id) {
                    Some(id) => self.datasette.fetch_chart(None, Some(id)).await,
                    None => None,
                }
            },
        );

        let mut candidates: Vec<Candidate> = staged
            .iter()
            .filter(|c| matches!(c.kind, CandidateKind::FullUrl | CandidateKind::SvgFilename))
            .cloned()
            .collect();
        if let (Some(slug), Some(guess)) = (confirmed_slug, plain) {
            candidates.push(Candidate::grapher(
                CandidateKind::PlainSlug,
                &slug,
                guess.query_params.clone(),
            ));
        }
        if let (Some(record), Some(guess)) = (&id_record, by_id) {
            candidates.push(Candidate {
                chart_id: Some(record.id),
                ..Candidate::grapher(
                    CandidateKind::ChartId,
                    &record.slug,
                    guess.query_params.clone(),
                )
            });
        }

        let mut reference = merge(&candidates);
        let mut notice = None;
        let final_phase = if reference.is_empty() {
            let slug = &self.settings.default_slug;
            info!("No chart found for {:?}, using {}", text, slug);
            reference = merge(&[Candidate::grapher(CandidateKind::PlainSlug, slug, None)]);
            if text != slug.as_str() {
                notice = Some(format!("No valid slug detected. Using {}", slug));
            }
            Phase::ResolvedWithFallback
        } else {
            Phase::Resolved
        };

        let known = id_record.filter(|r| Some(r.id) == reference.chart_id);
        self.complete(&mut reference, known).await;

        advance(&mut phase, final_phase);
        Resolution {
            reference,
            phase,
            notice,
        }
    }

    /// Fill in whichever of slug / chart id is missing and attach the chart config.
    async fn complete(&self, reference: &mut PageReference, known: Option<ChartRecord>) {
        if reference.slug.is_none() && reference.chart_id.is_none() {
            return;
        }
        let record = match known {
            Some(record) => Some(record),
            // Ids are stable, so look up by id alone when both halves are known.
            None if reference.chart_id.is_some() => {
                self.datasette.fetch_chart(None, reference.chart_id).await
            }
            None => self.datasette.fetch_chart(reference.slug.as_deref(), None).await,
        };
        let Some(record) = record else {
            return;
        };

        if reference.slug.is_none() {
            reference.slug = Some(record.slug);
        } else if reference.slug.as_deref() != Some(record.slug.as_str()) {
            debug!("Chart {} is published as {}, keeping {:?}", record.id, record.slug, reference.slug);
        }
        if reference.chart_id.is_none() {
            reference.chart_id = Some(record.id);
        }
        reference.chart_config = record.config;
    }
}

fn advance(phase: &mut Phase, next: Phase) {
    debug!("resolver: {:?} -> {:?}", phase, next);
    *phase = next;
}
