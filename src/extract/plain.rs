use super::{Candidate, CandidateKind};

/// Stage `slug[?query]` text as an unconfirmed slug, and additionally as a
/// chart id when the slug part is an integer.
pub fn stage(text: &str) -> Vec<Candidate> {
    let (head, query) = match text.split_once('?') {
        Some((head, query)) => (head, Some(query).filter(|q| !q.is_empty())),
        None => (text, None),
    };
    if !could_be_slug(head) {
        return Vec::new();
    }
    let query = query.map(str::to_string);

    let mut staged = vec![Candidate::grapher(CandidateKind::PlainSlug, head, query.clone())];
    if let Ok(chart_id) = head.parse::<u64>() {
        staged.push(Candidate {
            chart_id: Some(chart_id),
            query_params: query,
            ..Candidate::new(CandidateKind::ChartId)
        });
    }
    staged
}

fn could_be_slug(head: &str) -> bool {
    !head.is_empty() && !head.contains('/') && !head.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_with_trailing_query() {
        let staged = stage("life-expectancy?tab=map&country=~FRA");
        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].kind, CandidateKind::PlainSlug);
        assert_eq!(staged[0].slug.as_deref(), Some("life-expectancy"));
        assert_eq!(staged[0].query_params.as_deref(), Some("tab=map&country=~FRA"));
    }

    #[test]
    fn splits_on_first_question_mark_only() {
        let staged = stage("gdp?a=1?b=2");
        assert_eq!(staged[0].slug.as_deref(), Some("gdp"));
        assert_eq!(staged[0].query_params.as_deref(), Some("a=1?b=2"));
    }

    #[test]
    fn integer_is_also_a_chart_id() {
        let staged = stage("42?tab=table");
        assert_eq!(staged.len(), 2);
        assert_eq!(staged[0].slug.as_deref(), Some("42"));
        assert_eq!(staged[1].kind, CandidateKind::ChartId);
        assert_eq!(staged[1].chart_id, Some(42));
        assert_eq!(staged[1].slug, None);
        assert_eq!(staged[1].query_params.as_deref(), Some("tab=table"));
    }

    #[test]
    fn negative_or_oversized_numbers_are_only_slugs() {
        assert_eq!(stage("-3").len(), 1);
        assert_eq!(stage("123456789012345678901234567890").len(), 1);
    }

    #[test]
    fn paths_and_sentences_are_not_staged() {
        assert!(stage("").is_empty());
        assert!(stage("?tab=map").is_empty());
        assert!(stage("https://ourworldindata.org/grapher/gdp").is_empty());
        assert!(stage("hello world").is_empty());
    }
}
