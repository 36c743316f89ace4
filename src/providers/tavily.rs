//! Tavily hosted search API.

use serde::{Deserialize, Serialize};

use super::{send_json, ApiKey, ProviderError, SearchProvider};
use crate::types::{SearchResponse, SearchResult};

const NAME: &str = "tavily";
const TAVILY_API_URL: &str = "https://api.tavily.com/search";

#[derive(Debug, Clone)]
pub struct TavilySearchProvider {
    http: reqwest::Client,
    api_key: ApiKey,
    endpoint: String,
}

impl TavilySearchProvider {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key: ApiKey(api_key),
            endpoint: TAVILY_API_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'static str,
    include_images: bool,
    max_results: u8,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
    #[serde(default)]
    images: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

impl SearchProvider for TavilySearchProvider {
    async fn search(&self, query: &str) -> Result<SearchResponse, ProviderError> {
        let body = TavilyRequest {
            api_key: &self.api_key.0,
            query,
            search_depth: "basic",
            include_images: true,
            max_results: 10,
        };
        let data: TavilyResponse = send_json(NAME, self.http.post(&self.endpoint).json(&body)).await?;

        Ok(SearchResponse {
            results: data
                .results
                .into_iter()
                .map(|r| SearchResult {
                    title: r.title,
                    url: r.url,
                    content: r.content,
                })
                .collect(),
            images: data.images,
        })
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_key_and_maps_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(serde_json::json!({
                "api_key": "tvly-key",
                "query": "zakat on gold",
                "include_images": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": "zakat on gold",
                "results": [
                    { "title": "Zakat", "url": "https://islamqa.info/en/answers/1", "content": "Nisab...", "score": 0.9 }
                ],
                "images": ["https://img.test/gold.png"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = TavilySearchProvider::new(reqwest::Client::new(), "tvly-key".into())
            .with_endpoint(&format!("{}/search", server.uri()));
        let response = provider.search("zakat on gold").await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].content, "Nisab...");
        assert_eq!(response.images, vec!["https://img.test/gold.png".to_string()]);
    }

    #[tokio::test]
    async fn unauthorized_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let provider = TavilySearchProvider::new(reqwest::Client::new(), "bad".into())
            .with_endpoint(&format!("{}/search", server.uri()));
        let err = provider.search("q").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 401, .. }));
    }
}
