use thiserror::Error;

/// Missing or malformed configuration. These are the only failures whose
/// message is shown to the caller verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{remediation}")]
    Missing {
        name: &'static str,
        remediation: String,
    },

    #[error("Invalid search provider '{0}'. Please set the SEARCH_PROVIDER environment variable to either 'searxng', 'tavily', 'serper', or 'bing'.")]
    InvalidProvider(String),

    #[error("Invalid value '{value}' for {name}. Expected one of y, yes, t, true, on, 1, n, no, f, false, off, 0.")]
    InvalidFlag { name: &'static str, value: String },

    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("Unsupported CACHE_URL '{0}'. Use 'redis://host:port', 'memory://', or leave it unset to disable caching.")]
    UnsupportedCache(String),
}

/// Public failure of [`crate::search::perform_search`].
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("There was an error while searching.")]
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_search_hides_detail() {
        assert_eq!(
            SearchError::Failed.to_string(),
            "There was an error while searching."
        );
    }

    #[test]
    fn config_error_passes_remediation_through() {
        let err = SearchError::from(ConfigError::Missing {
            name: "SEARXNG_BASE_URL",
            remediation: "SEARXNG_BASE_URL is not set in the environment variables.".into(),
        });
        assert_eq!(
            err.to_string(),
            "SEARXNG_BASE_URL is not set in the environment variables."
        );
    }

    #[test]
    fn invalid_provider_lists_every_identifier() {
        let msg = ConfigError::InvalidProvider("carrierpigeon".into()).to_string();
        assert!(msg.contains("carrierpigeon"));
        for id in ["searxng", "tavily", "serper", "bing"] {
            assert!(msg.contains(id), "missing {id} in: {msg}");
        }
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConfigError>();
        assert_send_sync::<SearchError>();
    }
}
