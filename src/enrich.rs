//! Qur'an citation enrichment.
//!
//! Results linking to quran.com get their snippet replaced with the Uthmani
//! text of the verse and its Saheeh International translation, so the
//! assistant can quote it. Every failure keeps the original result.

use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::types::SearchResult;

const VERSE_SITE: &str = "quran.com";
// Saheeh International
const TRANSLATION_ID: &str = "131";

fn locator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"quran\.com/(\d+)(?:/(\d+))?").expect("verse locator pattern is valid")
    })
}

pub fn is_verse_site(url: &str) -> bool {
    url.contains(VERSE_SITE)
}

/// A `chapter:verse` reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseLocator {
    pub chapter: u32,
    pub verse: u32,
}

impl VerseLocator {
    /// Extract a locator from a quran.com URL. A chapter-only link points at
    /// its first verse.
    pub fn from_url(url: &str) -> Option<Self> {
        let caps = locator_pattern().captures(url)?;
        let chapter = caps.get(1)?.as_str().parse().ok()?;
        let verse = match caps.get(2) {
            Some(v) => v.as_str().parse().ok()?,
            None => 1,
        };
        Some(Self { chapter, verse })
    }
}

impl fmt::Display for VerseLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("verse request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("verse API returned status {0}")]
    Status(u16),

    #[error("verse API response has no text")]
    MissingText,

    #[error("verse API response has no translation")]
    MissingTranslation,
}

/// Outcome of one enrichment attempt.
#[derive(Debug)]
pub enum Enrichment {
    Enriched(SearchResult),
    Unchanged(SearchResult),
    Failed {
        original: SearchResult,
        error: EnrichError,
    },
}

impl Enrichment {
    pub fn into_result(self) -> SearchResult {
        match self {
            Enrichment::Enriched(r) | Enrichment::Unchanged(r) => r,
            Enrichment::Failed { original, .. } => original,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VerseEnvelope {
    #[serde(default)]
    verse: Option<Verse>,
}

#[derive(Debug, Deserialize)]
struct Verse {
    #[serde(default)]
    text_uthmani: String,
    // Absent key means no translation text; an empty list is a failure
    #[serde(default)]
    translations: Option<Vec<Translation>>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[serde(default)]
    text: String,
}

/// Client for the verse-by-key endpoint.
#[derive(Debug, Clone)]
pub struct VerseClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl VerseClient {
    pub fn new(http: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Fetch `(text, translation)` for a verse.
    pub async fn fetch(&self, locator: VerseLocator) -> Result<(String, String), EnrichError> {
        let url = format!("{}/verses/by_key/{}", self.base_url, locator);
        let resp = self
            .http
            .get(&url)
            .query(&[("language", "en"), ("translations", TRANSLATION_ID)])
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(EnrichError::Status(status.as_u16()));
        }

        let body: VerseEnvelope = resp.json().await?;
        let verse = body.verse.ok_or(EnrichError::MissingText)?;
        if verse.text_uthmani.is_empty() {
            return Err(EnrichError::MissingText);
        }
        let translation = match verse.translations {
            Some(list) => {
                list.into_iter()
                    .next()
                    .ok_or(EnrichError::MissingTranslation)?
                    .text
            }
            None => String::new(),
        };
        Ok((verse.text_uthmani, translation))
    }

    pub async fn enrich(&self, result: SearchResult) -> Enrichment {
        if !is_verse_site(&result.url) {
            return Enrichment::Unchanged(result);
        }
        let Some(locator) = VerseLocator::from_url(&result.url) else {
            return Enrichment::Unchanged(result);
        };

        match self.fetch(locator).await {
            Ok((text, translation)) => Enrichment::Enriched(SearchResult {
                title: result.title,
                url: result.url,
                content: format!("{text} — {translation}"),
            }),
            Err(error) => Enrichment::Failed {
                original: result,
                error,
            },
        }
    }
}

/// Enrich all results concurrently. Output has the same length and order as
/// the input.
pub async fn enrich_results(client: &VerseClient, results: Vec<SearchResult>) -> Vec<SearchResult> {
    let attempts = results.into_iter().map(|r| client.enrich(r));
    futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|outcome| {
            if let Enrichment::Failed { original, error } = &outcome {
                debug!(url = %original.url, error = %error, "verse enrichment skipped");
            }
            outcome.into_result()
        })
        .collect()
}
