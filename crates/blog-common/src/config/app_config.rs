//! Application configuration structs
//!
//! Loads configuration from environment variables, reading a `.env` file
//! first when one is present.

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Absent when `REDIS_URL` is unset
    pub redis: Option<RedisConfig>,
    pub session: SessionConfig,
    pub cache: CacheConfig,
    pub storage: StorageConfig,
    pub pagination: PaginationConfig,
    pub rate_limit: RateLimitConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply the bundled schema on startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Login session cookie configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    /// Session lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: i64,
    /// Mark the cookie `Secure` (HTTPS only)
    #[serde(default)]
    pub secure_cookie: bool,
}

/// Where rendered pages are cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Redis,
    Memory,
    #[serde(rename = "none")]
    Disabled,
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" | "moka" => Ok(Self::Memory),
            "none" | "off" | "disabled" => Ok(Self::Disabled),
            other => Err(ConfigError::InvalidValue("CACHE_BACKEND", other.to_string())),
        }
    }
}

/// Page cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// How long the post index stays cached
    #[serde(default = "default_index_ttl")]
    pub index_ttl_secs: u64,
    /// Entry cap for the in-memory backend
    #[serde(default = "default_cache_capacity")]
    pub max_entries: u64,
}

/// Uploaded media configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_media_root")]
    pub media_root: String,
    #[serde(default = "default_max_upload")]
    pub max_upload_mb: u32,
}

impl StorageConfig {
    #[must_use]
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb as usize * 1024 * 1024
    }
}

/// Feed pagination configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: u32,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

// Default value functions
fn default_app_name() -> String {
    "yatube".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_session_ttl() -> i64 {
    1_209_600 // 14 days
}

fn default_index_ttl() -> u64 {
    20
}

fn default_cache_capacity() -> u64 {
    10_000
}

fn default_media_root() -> String {
    "./media".to_string()
}

fn default_max_upload() -> u32 {
    5
}

fn default_posts_per_page() -> u32 {
    10
}

fn default_requests_per_second() -> u32 {
    20
}

fn default_burst() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if required variables are missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let redis = vars.get("REDIS_URL").map(|url| RedisConfig {
            url,
            max_connections: vars.parsed_or("REDIS_MAX_CONNECTIONS", default_redis_max_connections),
        });

        let backend = match vars.get("CACHE_BACKEND") {
            Some(raw) => raw.parse()?,
            None if redis.is_some() => CacheBackend::Redis,
            None => CacheBackend::Memory,
        };
        if backend == CacheBackend::Redis && redis.is_none() {
            return Err(ConfigError::MissingVar("REDIS_URL"));
        }

        let posts_per_page = vars.parsed_or("POSTS_PER_PAGE", default_posts_per_page);
        if posts_per_page == 0 {
            return Err(ConfigError::InvalidValue("POSTS_PER_PAGE", "0".to_string()));
        }

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars
                    .get("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: vars.get("HOST").unwrap_or_else(default_host),
                port: vars
                    .get("PORT")
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("PORT"))?,
                request_timeout_secs: vars.parsed_or("REQUEST_TIMEOUT_SECS", default_request_timeout),
            },
            database: DatabaseConfig {
                url: vars.require("DATABASE_URL")?,
                max_connections: vars.parsed_or("DATABASE_MAX_CONNECTIONS", default_max_connections),
                min_connections: vars.parsed_or("DATABASE_MIN_CONNECTIONS", default_min_connections),
                run_migrations: vars.parsed_or("DATABASE_RUN_MIGRATIONS", default_true),
            },
            redis,
            session: SessionConfig {
                secret: vars.require("SESSION_SECRET")?,
                ttl_secs: vars.parsed_or("SESSION_TTL_SECS", default_session_ttl),
                secure_cookie: vars.parsed_or("SESSION_SECURE_COOKIE", bool::default),
            },
            cache: CacheConfig {
                backend,
                index_ttl_secs: vars.parsed_or("CACHE_INDEX_TTL_SECS", default_index_ttl),
                max_entries: vars.parsed_or("CACHE_MAX_ENTRIES", default_cache_capacity),
            },
            storage: StorageConfig {
                media_root: vars.get("MEDIA_ROOT").unwrap_or_else(default_media_root),
                max_upload_mb: vars.parsed_or("MAX_UPLOAD_MB", default_max_upload),
            },
            pagination: PaginationConfig { posts_per_page },
            rate_limit: RateLimitConfig {
                enabled: vars.parsed_or("RATE_LIMIT_ENABLED", default_true),
                requests_per_second: vars
                    .parsed_or("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second),
                burst: vars.parsed_or("RATE_LIMIT_BURST", default_burst),
            },
            snowflake: SnowflakeConfig {
                worker_id: vars.parsed_or("WORKER_ID", u16::default),
            },
        })
    }
}

/// Thin wrapper over a variable lookup
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn require(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn parsed_or<T: FromStr>(&self, key: &str, default: fn() -> T) -> T {
        self.get(key)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(default)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
