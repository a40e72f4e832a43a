//! Rendered page cache
//!
//! Entries are whole response bodies keyed by request path and viewer. Every
//! entry lives for the configured TTL; nothing is invalidated on writes, so a
//! cached page may show stale posts until it expires.

use std::time::Duration;

use blog_common::{CacheBackend, CacheConfig, RedisConfig};
use blog_core::Snowflake;
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::pool::{RedisPool, RedisPoolError};

const KEY_PREFIX: &str = "page";

/// Errors raised by a cache backend
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error(transparent)]
    Redis(#[from] RedisPoolError),

    #[error("Cache misconfigured: {0}")]
    Config(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache key for a page as seen by one viewer
pub fn page_key(path_and_query: &str, viewer: Option<Snowflake>) -> String {
    match viewer {
        Some(id) => format!("{KEY_PREFIX}:{id}:{path_and_query}"),
        None => format!("{KEY_PREFIX}:anon:{path_and_query}"),
    }
}

/// Page cache over one of the configured backends
#[derive(Clone)]
pub enum PageCache {
    Redis { pool: RedisPool, ttl: Duration },
    InMemory(Cache<String, String>),
    Disabled,
}

impl std::fmt::Debug for PageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PageCache").field(&self.backend_name()).finish()
    }
}

impl PageCache {
    #[must_use]
    pub fn in_memory(capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(capacity)
            .build();
        Self::InMemory(inner)
    }

    #[must_use]
    pub fn redis(pool: RedisPool, ttl: Duration) -> Self {
        Self::Redis { pool, ttl }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::Disabled
    }

    /// Build the backend named by the configuration
    pub fn from_config(cache: &CacheConfig, redis: Option<&RedisConfig>) -> CacheResult<Self> {
        let ttl = Duration::from_secs(cache.index_ttl_secs);
        let page_cache = match cache.backend {
            CacheBackend::Redis => {
                let redis = redis.ok_or_else(|| {
                    CacheError::Config("redis backend selected without REDIS_URL".to_string())
                })?;
                Self::redis(RedisPool::from_config(redis)?, ttl)
            }
            CacheBackend::Memory => Self::in_memory(cache.max_entries, ttl),
            CacheBackend::Disabled => Self::disabled(),
        };
        tracing::info!(backend = page_cache.backend_name(), ttl_secs = cache.index_ttl_secs, "Page cache ready");
        Ok(page_cache)
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Redis { .. } => "redis",
            Self::InMemory(_) => "memory",
            Self::Disabled => "none",
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let hit = match self {
            Self::Redis { pool, .. } => pool.get_string(key).await?,
            Self::InMemory(cache) => cache.get(key).await,
            Self::Disabled => None,
        };
        debug!(hit = hit.is_some(), "Page cache lookup");
        Ok(hit)
    }

    #[instrument(skip(self, body), fields(len = body.len()))]
    pub async fn set(&self, key: &str, body: &str) -> CacheResult<()> {
        match self {
            Self::Redis { pool, ttl } => pool.set_ex(key, body, ttl.as_secs().max(1)).await?,
            Self::InMemory(cache) => cache.insert(key.to_string(), body.to_string()).await,
            Self::Disabled => {}
        }
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        match self {
            Self::Redis { pool, .. } => {
                pool.delete(key).await?;
            }
            Self::InMemory(cache) => cache.invalidate(key).await,
            Self::Disabled => {}
        }
        Ok(())
    }

    /// Ping the backend; always healthy when not networked
    pub async fn health_check(&self) -> CacheResult<()> {
        if let Self::Redis { pool, .. } = self {
            pool.health_check().await?;
        }
        Ok(())
    }
}
