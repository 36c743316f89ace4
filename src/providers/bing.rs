//! Bing Web Search API v7.

use serde::Deserialize;

use super::{send_json, ApiKey, ProviderError, SearchProvider};
use crate::types::{SearchResponse, SearchResult};

const NAME: &str = "bing";
const BING_API_URL: &str = "https://api.bing.microsoft.com/v7.0/search";
const MAX_IMAGES: usize = 4;

#[derive(Debug, Clone)]
pub struct BingSearchProvider {
    http: reqwest::Client,
    api_key: ApiKey,
    endpoint: String,
}

impl BingSearchProvider {
    pub fn new(http: reqwest::Client, api_key: String) -> Self {
        Self {
            http,
            api_key: ApiKey(api_key),
            endpoint: BING_API_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BingResponse {
    #[serde(default)]
    web_pages: Option<BingWebPages>,
    #[serde(default)]
    images: Option<BingImages>,
}

#[derive(Debug, Deserialize)]
struct BingWebPages {
    #[serde(default)]
    value: Vec<BingWebPage>,
}

#[derive(Debug, Deserialize)]
struct BingWebPage {
    #[serde(default)]
    name: String,
    url: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct BingImages {
    #[serde(default)]
    value: Vec<BingImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BingImage {
    content_url: String,
}

impl SearchProvider for BingSearchProvider {
    async fn search(&self, query: &str) -> Result<SearchResponse, ProviderError> {
        let request = self
            .http
            .get(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.api_key.0)
            .query(&[
                ("q", query),
                ("count", "10"),
                ("mkt", "en-US"),
                ("responseFilter", "Webpages,Images"),
            ]);
        let data: BingResponse = send_json(NAME, request).await?;

        let results = data
            .web_pages
            .map(|w| w.value)
            .unwrap_or_default()
            .into_iter()
            .map(|p| SearchResult {
                title: p.name,
                url: p.url,
                content: p.snippet,
            })
            .collect();
        let images = data
            .images
            .map(|i| i.value)
            .unwrap_or_default()
            .into_iter()
            .map(|i| i.content_url)
            .take(MAX_IMAGES)
            .collect();

        Ok(SearchResponse { results, images })
    }

    fn name(&self) -> &'static str {
        NAME
    }
}
