//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, CacheBackend, CacheConfig, ConfigError, DatabaseConfig, Environment,
    PaginationConfig, RateLimitConfig, RedisConfig, ServerConfig, SessionConfig, SnowflakeConfig,
    StorageConfig,
};
