//! Trusted-source allow-list.

use crate::types::SearchResult;

/// Recognised Islamic reference sites. Matched as case-sensitive substrings
/// of the result URL.
pub const ALLOWED_DOMAINS: &[&str] = &[
    "quran.com",
    "sunnah.com",
    "islamqa.info",
    "seekersguidance.org",
    "daruliftaa.com",
    "aboutislam.net",
    "islamicstudies.info",
    "qurancentral.com",
];

pub fn is_allowed(url: &str, allowed: &[&str]) -> bool {
    allowed.iter().any(|domain| url.contains(domain))
}

/// Keep only results whose URL contains an allowed domain, in input order.
pub fn filter_allowed(results: Vec<SearchResult>, allowed: &[&str]) -> Vec<SearchResult> {
    results
        .into_iter()
        .filter(|r| is_allowed(&r.url, allowed))
        .collect()
}
