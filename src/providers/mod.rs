//! Pluggable web-search backends and the selector that picks one from
//! configuration.

pub mod bing;
pub mod searxng;
pub mod serper;
pub mod tavily;

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use thiserror::Error;

use crate::config::{self, EnvSource};
use crate::error::ConfigError;
use crate::types::SearchResponse;

pub use bing::BingSearchProvider;
pub use searxng::SearxngSearchProvider;
pub use serper::SerperSearchProvider;
pub use tavily::TavilySearchProvider;

pub const PROVIDER_VAR: &str = "SEARCH_PROVIDER";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to parse {provider} response: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },
}

/// A backend that turns a query into results and images.
pub trait SearchProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<SearchResponse, ProviderError>> + Send;

    fn name(&self) -> &'static str;
}

/// Send a prepared request and decode the JSON body, mapping failures to
/// [`ProviderError`].
pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let resp = request
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|source| ProviderError::Http { provider, source })?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let body = body.chars().take(200).collect();
        return Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    resp.json::<T>().await.map_err(|e| ProviderError::Parse {
        provider,
        message: e.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Searxng,
    Tavily,
    Serper,
    Bing,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Searxng,
        ProviderKind::Tavily,
        ProviderKind::Serper,
        ProviderKind::Bing,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::Searxng => "searxng",
            ProviderKind::Tavily => "tavily",
            ProviderKind::Serper => "serper",
            ProviderKind::Bing => "bing",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| ConfigError::InvalidProvider(s.to_string()))
    }
}

/// The configured backend.
#[derive(Debug, Clone)]
pub enum Provider {
    Searxng(SearxngSearchProvider),
    Tavily(TavilySearchProvider),
    Serper(SerperSearchProvider),
    Bing(BingSearchProvider),
}

impl Provider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Searxng(_) => ProviderKind::Searxng,
            Provider::Tavily(_) => ProviderKind::Tavily,
            Provider::Serper(_) => ProviderKind::Serper,
            Provider::Bing(_) => ProviderKind::Bing,
        }
    }
}

impl SearchProvider for Provider {
    async fn search(&self, query: &str) -> Result<SearchResponse, ProviderError> {
        match self {
            Provider::Searxng(p) => p.search(query).await,
            Provider::Tavily(p) => p.search(query).await,
            Provider::Serper(p) => p.search(query).await,
            Provider::Bing(p) => p.search(query).await,
        }
    }

    fn name(&self) -> &'static str {
        self.kind().id()
    }
}

/// Build the provider named by `SEARCH_PROVIDER` (default `searxng`),
/// resolving only that provider's credential. No network I/O happens here.
pub fn select_provider(
    env: &dyn EnvSource,
    http: &reqwest::Client,
) -> Result<Provider, ConfigError> {
    // Only an unset variable selects the default; a blank value is invalid
    let kind = match env.var(PROVIDER_VAR) {
        Some(id) => id.parse()?,
        None => ProviderKind::Searxng,
    };

    let provider = match kind {
        ProviderKind::Searxng => {
            let base_url = config::require(
                env,
                "SEARXNG_BASE_URL",
                "SEARXNG_BASE_URL is not set in the environment variables.",
            )?;
            Provider::Searxng(SearxngSearchProvider::new(http.clone(), &base_url)?)
        }
        ProviderKind::Tavily => {
            let api_key = config::require(
                env,
                "TAVILY_API_KEY",
                "Tavily API key is not set in the environment variables. Please set the TAVILY_API_KEY environment variable or set SEARCH_PROVIDER to 'searxng' or 'serper'.",
            )?;
            Provider::Tavily(TavilySearchProvider::new(http.clone(), api_key))
        }
        ProviderKind::Serper => {
            let api_key = config::require(
                env,
                "SERPER_API_KEY",
                "Serper API key is not set in the environment variables. Please set the SERPER_API_KEY environment variable or set SEARCH_PROVIDER to 'searxng' or 'tavily'.",
            )?;
            Provider::Serper(SerperSearchProvider::new(http.clone(), api_key))
        }
        ProviderKind::Bing => {
            let api_key = config::require(
                env,
                "BING_API_KEY",
                "Bing API key is not set in the environment variables. Please set the BING_API_KEY environment variable or set SEARCH_PROVIDER to 'searxng', 'tavily', or 'serper'.",
            )?;
            Provider::Bing(BingSearchProvider::new(http.clone(), api_key))
        }
    };
    Ok(provider)
}

/// Wrapper that keeps API keys out of `Debug` output.
#[derive(Clone)]
pub(crate) struct ApiKey(pub(crate) String);

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticEnv;

    fn select(env: &StaticEnv) -> Result<Provider, ConfigError> {
        select_provider(env, &reqwest::Client::new())
    }

    #[test]
    fn defaults_to_searxng() {
        let env = StaticEnv::new().with("SEARXNG_BASE_URL", "http://localhost:8888");
        assert_eq!(select(&env).unwrap().kind(), ProviderKind::Searxng);
    }

    #[test]
    fn blank_provider_is_invalid() {
        for blank in ["", "  "] {
            let env = StaticEnv::new()
                .with(PROVIDER_VAR, blank)
                .with("SEARXNG_BASE_URL", "http://localhost:8888");
            assert_eq!(
                select(&env).unwrap_err(),
                ConfigError::InvalidProvider(blank.to_string())
            );
        }
    }

    #[test]
    fn each_provider_resolves_its_own_credential() {
        let cases = [
            ("tavily", "TAVILY_API_KEY", ProviderKind::Tavily),
            ("serper", "SERPER_API_KEY", ProviderKind::Serper),
            ("bing", "BING_API_KEY", ProviderKind::Bing),
        ];
        for (id, var, kind) in cases {
            let env = StaticEnv::new().with(PROVIDER_VAR, id).with(var, "secret");
            let provider = select(&env).unwrap();
            assert_eq!(provider.kind(), kind);
            assert_eq!(provider.name(), id);
        }
    }

    #[test]
    fn missing_searxng_url_is_config_error() {
        let err = select(&StaticEnv::new()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing {
                name: "SEARXNG_BASE_URL",
                remediation: "SEARXNG_BASE_URL is not set in the environment variables.".into(),
            }
        );
    }

    #[test]
    fn missing_vendor_key_suggests_alternatives() {
        let env = StaticEnv::new().with(PROVIDER_VAR, "bing");
        let msg = select(&env).unwrap_err().to_string();
        assert!(msg.contains("BING_API_KEY"));
        assert!(msg.contains("'searxng', 'tavily', or 'serper'"));

        let env = StaticEnv::new().with(PROVIDER_VAR, "tavily");
        let msg = select(&env).unwrap_err().to_string();
        assert!(msg.contains("TAVILY_API_KEY"));
        assert!(msg.contains("'searxng' or 'serper'"));
    }

    #[test]
    fn other_providers_credentials_are_not_required() {
        let env = StaticEnv::new()
            .with(PROVIDER_VAR, "serper")
            .with("SERPER_API_KEY", "k");
        assert!(select(&env).is_ok());
    }

    #[test]
    fn unknown_provider_is_distinct_error() {
        let env = StaticEnv::new().with(PROVIDER_VAR, "carrierpigeon");
        let err = select(&env).unwrap_err();
        assert_eq!(err, ConfigError::InvalidProvider("carrierpigeon".into()));
        let msg = err.to_string();
        for kind in ProviderKind::ALL {
            assert!(msg.contains(kind.id()));
        }
    }

    #[test]
    fn provider_ids_are_case_sensitive() {
        assert!("Tavily".parse::<ProviderKind>().is_err());
        assert_eq!("tavily".parse::<ProviderKind>().unwrap(), ProviderKind::Tavily);
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let env = StaticEnv::new()
            .with(PROVIDER_VAR, "tavily")
            .with("TAVILY_API_KEY", "tvly-very-secret");
        let debug = format!("{:?}", select(&env).unwrap());
        assert!(!debug.contains("tvly-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
