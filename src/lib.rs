pub mod cache;
pub mod config;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod mcp;
pub mod models;
pub mod providers;
pub mod search;
pub mod server;
pub mod types;

use std::sync::Arc;

use config::{CacheBackend, Config, EnvSource};

pub const USER_AGENT: &str = concat!("iqra-search/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    // Provider credentials and model flags are read through this per request
    pub env: Arc<dyn EnvSource>,
    pub http_client: reqwest::Client,
    pub verse_client: enrich::VerseClient,
    pub cache: Option<cache::ResponseCache>,
}

pub use error::{ConfigError, SearchError};
pub use types::*;

impl AppState {
    pub fn new(config: Config, env: Arc<dyn EnvSource>, http_client: reqwest::Client) -> Self {
        let verse_client = enrich::VerseClient::new(
            http_client.clone(),
            &config.verse_api_base,
            config.verse_timeout,
        );
        let cache = match config.cache {
            CacheBackend::Memory => Some(cache::ResponseCache::memory(config.cache_ttl)),
            CacheBackend::Redis(ref client) => {
                Some(cache::ResponseCache::redis(client.clone(), config.cache_ttl))
            }
            CacheBackend::Disabled => None,
        };
        Self {
            config,
            env,
            http_client,
            verse_client,
            cache,
        }
    }
}
