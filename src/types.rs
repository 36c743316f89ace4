use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// A single hit as returned by a provider, and after enrichment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    // Image URLs, passed through as the provider returned them
    #[serde(default)]
    pub images: Vec<String>,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateModelRequest {
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateModelResponse {
    pub valid: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
