//! # blog-cache
//!
//! Rendered-page cache for the post index.
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Page Cache**: one [`PageCache`] type over Redis, an in-process moka
//!   cache, or nothing at all, selected by configuration
//!
//! ## Example
//!
//! ```ignore
//! use blog_cache::{page_key, PageCache};
//!
//! let cache = PageCache::in_memory(1_000, Duration::from_secs(20));
//! let key = page_key("/?page=2", None);
//! if cache.get(&key).await?.is_none() {
//!     cache.set(&key, &rendered).await?;
//! }
//! ```

pub mod page;
pub mod pool;

pub use page::{page_key, CacheError, CacheResult, PageCache};
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
