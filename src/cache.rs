//! Response cache keyed by the raw query.
//!
//! Entries hold the JSON encoding of a composed [`SearchResponse`] and expire
//! after a fixed TTL. Keys are not normalised: `"zakat"` and `"Zakat "` are
//! different entries.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use redis::aio::ConnectionManager;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::types::SearchResponse;

const MAX_CACHE_ENTRIES: u64 = 10_000;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to encode cache entry: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode cache entry: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("redis cache unavailable: {0}")]
    Redis(#[from] redis::RedisError),
}

pub fn cache_key(query: &str) -> String {
    format!("search:{query}")
}

/// Decode a stored entry. Accepts both the single-encoded form written by
/// [`encode_entry`] and the double-encoded form (a JSON string holding the
/// response JSON).
pub fn decode_entry(raw: &str) -> Result<SearchResponse, CacheError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(CacheError::Decode)?;
    let value = match value {
        serde_json::Value::String(inner) => {
            serde_json::from_str(&inner).map_err(CacheError::Decode)?
        }
        other => other,
    };
    serde_json::from_value(value).map_err(CacheError::Decode)
}

pub fn encode_entry(response: &SearchResponse) -> Result<String, CacheError> {
    serde_json::to_string(response).map_err(CacheError::Encode)
}

#[derive(Clone)]
enum Store {
    Memory(Cache<String, String>),
    Redis {
        client: redis::Client,
        // Connected on first use so startup does not wait on the server
        conn: Arc<OnceCell<ConnectionManager>>,
    },
}

#[derive(Clone)]
pub struct ResponseCache {
    store: Store,
    ttl: Duration,
}

impl fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = match &self.store {
            Store::Memory(_) => "memory",
            Store::Redis { .. } => "redis",
        };
        f.debug_struct("ResponseCache")
            .field("backend", &backend)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl ResponseCache {
    /// In-process store, lost on restart.
    pub fn memory(ttl: Duration) -> Self {
        Self {
            store: Store::Memory(
                Cache::builder()
                    .max_capacity(MAX_CACHE_ENTRIES)
                    .time_to_live(ttl)
                    .build(),
            ),
            ttl,
        }
    }

    /// Shared Redis store. Entries are written with `SET key value EX ttl`.
    pub fn redis(client: redis::Client, ttl: Duration) -> Self {
        Self {
            store: Store::Redis {
                client,
                conn: Arc::new(OnceCell::new()),
            },
            ttl,
        }
    }

    pub async fn get(&self, query: &str) -> Result<Option<SearchResponse>, CacheError> {
        match self.get_raw(&cache_key(query)).await? {
            Some(raw) => decode_entry(&raw).map(Some),
            None => Ok(None),
        }
    }

    pub async fn put(&self, query: &str, response: &SearchResponse) -> Result<(), CacheError> {
        let raw = encode_entry(response)?;
        self.set_raw(cache_key(query), raw).await
    }

    /// Store an already-encoded entry under `key` as-is.
    #[cfg(test)]
    pub(crate) async fn put_raw(&self, key: String, raw: String) -> Result<(), CacheError> {
        self.set_raw(key, raw).await
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        match &self.store {
            Store::Memory(cache) => Ok(cache.get(key).await),
            Store::Redis { client, conn } => {
                let mut conn = connection(client, conn).await?;
                let raw: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
                Ok(raw)
            }
        }
    }

    async fn set_raw(&self, key: String, raw: String) -> Result<(), CacheError> {
        match &self.store {
            Store::Memory(cache) => {
                cache.insert(key, raw).await;
                Ok(())
            }
            Store::Redis { client, conn } => {
                let mut conn = connection(client, conn).await?;
                let _: () = redis::cmd("SET")
                    .arg(&key)
                    .arg(raw)
                    .arg("EX")
                    .arg(self.ttl.as_secs().max(1))
                    .query_async(&mut conn)
                    .await?;
                Ok(())
            }
        }
    }
}

async fn connection(
    client: &redis::Client,
    cell: &OnceCell<ConnectionManager>,
) -> Result<ConnectionManager, CacheError> {
    let conn = cell
        .get_or_try_init(|| ConnectionManager::new(client.clone()))
        .await?;
    Ok(conn.clone())
}
