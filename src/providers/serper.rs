//! Serper (Google results) hosted search API.

use serde::Deserialize;

use super::{send_json, ApiKey, ProviderError, SearchProvider};
use crate::types::{SearchResponse, SearchResult};

const NAME: &str = "serper";
const SERPER_API_URL: &str = "https://google.serper.dev";
const MAX_IMAGES: usize = 4;

#[derive(Debug, Clone)]
pub struct SerperSearchProvider {
    http: reqwest::Client,
    api_key: ApiKey,
    base_url: String,
}

impl SerperSearchProvider {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key: ApiKey(api_key),
            base_url: SERPER_API_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &str,
    ) -> Result<T, ProviderError> {
        let request = self
            .http
            .post(format!("{}/{}", self.base_url, endpoint))
            .header("X-API-KEY", &self.api_key.0)
            .json(&serde_json::json!({ "q": query }));
        send_json(NAME, request).await
    }
}

#[derive(Debug, Deserialize)]
struct SerperSearchResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
}

#[derive(Debug, Deserialize)]
struct SerperOrganic {
    #[serde(default)]
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct SerperImagesResponse {
    #[serde(default)]
    images: Vec<SerperImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SerperImage {
    image_url: String,
}

impl SearchProvider for SerperSearchProvider {
    async fn search(&self, query: &str) -> Result<SearchResponse, ProviderError> {
        let (links, images) = futures::try_join!(
            self.post::<SerperSearchResponse>("search", query),
            self.post::<SerperImagesResponse>("images", query)
        )?;

        Ok(SearchResponse {
            results: links
                .organic
                .into_iter()
                .map(|r| SearchResult {
                    title: r.title,
                    url: r.link,
                    content: r.snippet,
                })
                .collect(),
            images: images
                .images
                .into_iter()
                .map(|i| i.image_url)
                .take(MAX_IMAGES)
                .collect(),
        })
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn maps_organic_results_and_images() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("X-API-KEY", "serper-key"))
            .and(body_json(serde_json::json!({ "q": "wudu steps" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "organic": [
                    { "title": "How to perform wudu", "link": "https://seekersguidance.org/wudu", "snippet": "Begin with intention", "position": 1 }
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/images"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "images": [ { "title": "wudu", "imageUrl": "https://img.test/wudu.jpg" } ]
            })))
            .mount(&server)
            .await;

        let provider = SerperSearchProvider::new(reqwest::Client::new(), "serper-key".into())
            .with_base_url(&server.uri());
        let response = provider.search("wudu steps").await.unwrap();
        assert_eq!(response.results[0].url, "https://seekersguidance.org/wudu");
        assert_eq!(response.results[0].content, "Begin with intention");
        assert_eq!(response.images, vec!["https://img.test/wudu.jpg".to_string()]);
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider =
            SerperSearchProvider::new(reqwest::Client::new(), "k".into()).with_base_url(&server.uri());
        assert!(matches!(
            provider.search("q").await.unwrap_err(),
            ProviderError::Parse { provider: "serper", .. }
        ));
    }
}
