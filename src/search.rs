use tracing::{debug, error, info, warn};

use crate::enrich::enrich_results;
use crate::error::SearchError;
use crate::filter::{filter_allowed, ALLOWED_DOMAINS};
use crate::providers::{select_provider, SearchProvider};
use crate::types::SearchResponse;
use crate::AppState;

/// Search trusted Islamic sources for `query`.
///
/// Selects the configured provider, then serves from cache or runs
/// search, allow-list filtering and verse enrichment. Configuration problems
/// come back as [`SearchError::Config`]; every other failure is logged and
/// reported as [`SearchError::Failed`].
pub async fn perform_search(state: &AppState, query: &str) -> Result<SearchResponse, SearchError> {
    let provider = select_provider(state.env.as_ref(), &state.http_client)?;
    search_with(state, &provider, query).await
}

/// Same pipeline as [`perform_search`] for an already-selected provider.
pub async fn search_with<P: SearchProvider>(
    state: &AppState,
    provider: &P,
    query: &str,
) -> Result<SearchResponse, SearchError> {
    info!("Searching for: {} via {}", query, provider.name());

    if let Some(cache) = &state.cache {
        match cache.get(query).await {
            Ok(Some(cached)) => {
                debug!("search cache hit for query");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => {
                error!("Search cache error: {}", e);
                return Err(SearchError::Failed);
            }
        }
    }

    let response = provider.search(query).await.map_err(|e| {
        error!(provider = provider.name(), "Search error: {}", e);
        SearchError::Failed
    })?;

    let total = response.results.len();
    let results = filter_allowed(response.results, ALLOWED_DOMAINS);
    info!("{} of {} results from trusted sources", results.len(), total);

    if results.is_empty() {
        warn!("no trusted source found");
        return Ok(SearchResponse::empty());
    }

    let composed = SearchResponse {
        results: enrich_results(&state.verse_client, results).await,
        images: response.images,
    };

    if let Some(cache) = &state.cache {
        cache.put(query, &composed).await.map_err(|e| {
            error!("Search cache error: {}", e);
            SearchError::Failed
        })?;
    }

    Ok(composed)
}
