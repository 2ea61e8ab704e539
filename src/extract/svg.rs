//! Filenames from the owid-grapher-svgs regression suite, e.g.
//! `svg/life-expectancy_v1_5b2a.svg` or
//! `all-views/svg/life-expectancy?tab=map_v1_5b2a.svg`.

use std::sync::LazyLock;

use regex::Regex;

use super::{Candidate, CandidateKind};

// The slug may itself carry a version suffix before the `?`; it is dropped.
// The query is greedy: only the last `_v<digits>` starts the file suffix.
static WITH_QUERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^all-views/svg/(?P<slug>[^?\n]+?)(?:_v\d+[^?\n]*)?\?(?P<query>.+)_v\d+.+$")
        .unwrap()
});
static PLAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^svg/(?P<slug>.+?)_v\d+.+$").unwrap());

pub fn match_filename(text: &str) -> Option<Candidate> {
    if let Some(caps) = WITH_QUERY_RE.captures(text) {
        return Some(Candidate::grapher(
            CandidateKind::SvgFilename,
            &caps["slug"],
            Some(caps["query"].to_string()),
        ));
    }
    PLAIN_RE
        .captures(text)
        .map(|caps| Candidate::grapher(CandidateKind::SvgFilename, &caps["slug"], None))
}
