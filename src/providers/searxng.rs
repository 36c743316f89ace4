//! Self-hosted SearXNG meta-search.

use serde::Deserialize;
use tracing::{debug, info};

use super::{send_json, ProviderError, SearchProvider};
use crate::error::ConfigError;
use crate::types::{SearchResponse, SearchResult};

const NAME: &str = "searxng";
const MAX_LINKS: usize = 10;
const MAX_IMAGES: usize = 4;

#[derive(Debug, Clone)]
pub struct SearxngSearchProvider {
    http: reqwest::Client,
    base_url: String,
}

impl SearxngSearchProvider {
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, ConfigError> {
        url::Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
            name: "SEARXNG_BASE_URL",
            reason: e.to_string(),
        })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn query(&self, query: &str, category: &str) -> Result<SearxngResponse, ProviderError> {
        let search_url = format!("{}/search", self.base_url);
        debug!("Search URL: {} (category {})", search_url, category);
        let request = self
            .http
            .get(&search_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("categories", category),
                ("language", "en"),
                ("safesearch", "1"),
                ("pageno", "1"),
            ]);
        send_json(NAME, request).await
    }
}

impl SearchProvider for SearxngSearchProvider {
    async fn search(&self, query: &str) -> Result<SearchResponse, ProviderError> {
        let (links, images) =
            futures::try_join!(self.query(query, "general"), self.query(query, "images"))?;

        info!("SearXNG returned {} results", links.results.len());

        let results = links
            .results
            .into_iter()
            .take(MAX_LINKS)
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                content: r.content.unwrap_or_default(),
            })
            .collect();

        let images = images
            .results
            .into_iter()
            .filter_map(|r| r.img_src)
            .filter(|src| !src.is_empty())
            .take(MAX_IMAGES)
            .collect();

        Ok(SearchResponse { results, images })
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

// SearXNG API types
#[derive(Debug, Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearxngResult>,
}

#[derive(Debug, Deserialize)]
struct SearxngResult {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    img_src: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn rejects_relative_base_url() {
        let err = SearxngSearchProvider::new(reqwest::Client::new(), "/searx").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: "SEARXNG_BASE_URL", .. }));
        assert!(SearxngSearchProvider::new(reqwest::Client::new(), "http://searx:8080").is_ok());
    }

    #[tokio::test]
    async fn maps_links_and_images() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("categories", "general"))
            .and(query_param("format", "json"))
            .and(query_param("q", "ayat al kursi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": "ayat al kursi",
                "number_of_results": 2,
                "results": [
                    { "url": "https://quran.com/2/255", "title": "Al-Baqarah 255", "content": "Allah!", "engine": "google" },
                    { "url": "https://example.com", "title": "Other", "engine": "bing" }
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("categories", "images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    { "url": "https://img.test/page", "title": "img", "img_src": "https://img.test/a.png" },
                    { "url": "https://img.test/page2", "title": "img2", "img_src": "" }
                ]
            })))
            .mount(&server)
            .await;

        let provider =
            SearxngSearchProvider::new(reqwest::Client::new(), &format!("{}/", server.uri())).unwrap();
        let response = provider.search("ayat al kursi").await.unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].url, "https://quran.com/2/255");
        assert_eq!(response.results[0].content, "Allah!");
        assert_eq!(response.results[1].content, "");
        assert_eq!(response.images, vec!["https://img.test/a.png".to_string()]);
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let provider = SearxngSearchProvider::new(reqwest::Client::new(), &server.uri()).unwrap();
        let err = provider.search("q").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 502, .. }));
    }
}
