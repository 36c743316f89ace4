//! Environment-backed configuration.
//!
//! [`Config`] is the snapshot taken once at startup. Provider credentials and
//! model flags are looked up per request through an [`EnvSource`], so a key
//! added to the environment after startup is picked up on the next request.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_VERSE_API_BASE: &str = "https://api.quran.com/api/v4";
pub const CACHE_TTL: Duration = Duration::from_secs(7200);
pub const VERSE_API_TIMEOUT: Duration = Duration::from_secs(5);

/// Where named configuration values come from.
pub trait EnvSource: Send + Sync + fmt::Debug {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment on every lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of values, used to inject configuration in tests.
#[derive(Debug, Default, Clone)]
pub struct StaticEnv {
    vars: HashMap<String, String>,
}

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvSource for StaticEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Non-empty value of `name`, trimmed. Blank counts as unset.
pub fn lookup(env: &dyn EnvSource, name: &str) -> Option<String> {
    env.var(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve a required value, failing with `remediation` as the message.
pub fn require(
    env: &dyn EnvSource,
    name: &'static str,
    remediation: &str,
) -> Result<String, ConfigError> {
    lookup(env, name).ok_or_else(|| ConfigError::Missing {
        name,
        remediation: remediation.to_string(),
    })
}

/// Parse a boolean feature flag, falling back to `default` when unset.
pub fn flag(env: &dyn EnvSource, name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(env, name) else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value: raw }),
    }
}

/// Which cache store backs search responses.
#[derive(Debug, Clone)]
pub enum CacheBackend {
    Disabled,
    Memory,
    Redis(redis::Client),
}

/// Startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub cache: CacheBackend,
    pub verse_api_base: String,
    pub cache_ttl: Duration,
    pub verse_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            cache: CacheBackend::Disabled,
            verse_api_base: DEFAULT_VERSE_API_BASE.to_string(),
            cache_ttl: CACHE_TTL,
            verse_timeout: VERSE_API_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_env(env: &dyn EnvSource) -> Result<Self, ConfigError> {
        let bind_addr = lookup(env, "BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let cache = match lookup(env, "CACHE_URL") {
            None => CacheBackend::Disabled,
            Some(u) if u == "memory" || u.starts_with("memory://") => CacheBackend::Memory,
            Some(u) if u.starts_with("redis://") => {
                let client = redis::Client::open(u.as_str()).map_err(|e| ConfigError::InvalidUrl {
                    name: "CACHE_URL",
                    reason: e.to_string(),
                })?;
                CacheBackend::Redis(client)
            }
            Some(u) => return Err(ConfigError::UnsupportedCache(u)),
        };

        let verse_api_base = match lookup(env, "VERSE_API_BASE_URL") {
            Some(base) => {
                url::Url::parse(&base).map_err(|e| ConfigError::InvalidUrl {
                    name: "VERSE_API_BASE_URL",
                    reason: e.to_string(),
                })?;
                base.trim_end_matches('/').to_string()
            }
            None => DEFAULT_VERSE_API_BASE.to_string(),
        };

        Ok(Self {
            bind_addr,
            cache,
            verse_api_base,
            ..Self::default()
        })
    }
}
