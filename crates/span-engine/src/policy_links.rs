//! Policy-link detection for the extension's "analyze policies" prompt
//!
//! Links are scored on their visible text, their `href`, and where the
//! resolved URL points. Only the scoring lives here; collecting anchors from
//! the DOM is the content script's job.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Minimum score for a link to be offered
pub const MIN_POLICY_SCORE: u32 = 8;

/// Maximum number of links offered
pub const MAX_CANDIDATES: usize = 6;

const TEXT_MATCH_SCORE: u32 = 10;
const HREF_HINT_SCORE: u32 = 3;
const SAME_HOST_SCORE: u32 = 2;
const POLICY_PATH_SCORE: u32 = 5;

lazy_static! {
    static ref LINK_TEXT_PATTERNS: Vec<Regex> = [
        r"(?i)privacy policy",
        r"(?i)privacy (notice|statement)",
        r"(?i)\bprivacy\b",
        r"(?i)your privacy choices?",
        r"(?i)cookie (notice|policy)",
        r"(?i)consumer health data",
        r"(?i)terms(?: of (?:use|service)| and conditions| & conditions)?",
        r"(?i)terms & conditions",
        r"(?i)payments? terms of use",
        r"(?i)end[-\s]?user (?:license|agreement)",
        r"(?i)\bEULA\b",
        r"(?i)user agreement",
        r"(?i)\blegal\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid link text pattern"))
    .collect();
    static ref HREF_HINTS: Vec<Regex> = [
        r"(?i)privacy",
        r"(?i)terms",
        r"(?i)eula",
        r"(?i)legal",
        r"(?i)policy",
        r"(?i)agreement",
        r"(?i)cookie",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid href hint"))
    .collect();
    static ref POLICY_PATH: Regex =
        Regex::new(r"(?i)\b(privacy|terms|eula|policy|agreement|cookie)\b").expect("valid path pattern");
}

/// An anchor as seen by the content script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLink {
    /// Visible text, or the aria-label/title when the text is empty
    pub text: String,
    pub href: String,
}

/// A link worth offering for analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    pub url: String,
    pub label: String,
    pub score: u32,
}

/// Score one link relative to the page it appears on
pub fn score_link(text: &str, href: &str, page: &Url) -> u32 {
    let text = text.trim();
    let mut score = 0;

    score += LINK_TEXT_PATTERNS
        .iter()
        .filter(|re| re.is_match(text))
        .count() as u32
        * TEXT_MATCH_SCORE;
    score += HREF_HINTS.iter().filter(|re| re.is_match(href)).count() as u32 * HREF_HINT_SCORE;

    if let Ok(resolved) = page.join(href) {
        if resolved.host_str().is_some() && resolved.host_str() == page.host_str() {
            score += SAME_HOST_SCORE;
        }
        if POLICY_PATH.is_match(resolved.path()) {
            score += POLICY_PATH_SCORE;
        }
    }
    score
}

/// Best policy links on a page: scored, filtered, deduplicated by resolved
/// URL (highest score kept) and capped.
pub fn collect_policy_links(links: &[RawLink], page_url: &str) -> Vec<LinkCandidate> {
    let Ok(page) = Url::parse(page_url) else {
        return Vec::new();
    };

    let mut candidates: Vec<LinkCandidate> = links
        .iter()
        .filter_map(|link| {
            let score = score_link(&link.text, &link.href, &page);
            if score < MIN_POLICY_SCORE {
                return None;
            }
            let url = page.join(&link.href).ok()?;
            let label = match link.text.trim() {
                "" => "policy".to_string(),
                text => text.to_string(),
            };
            Some(LinkCandidate {
                url: url.to_string(),
                label,
                score,
            })
        })
        .collect();

    // stable sort keeps document order among equal scores
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    let mut seen = std::collections::HashSet::new();
    candidates.retain(|c| seen.insert(c.url.clone()));
    candidates.truncate(MAX_CANDIDATES);
    candidates
}
