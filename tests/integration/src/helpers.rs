//! Test helpers for integration tests
//!
//! [`TestServer`] runs the full router on an ephemeral port over a
//! [`MemoryDb`] and a temporary media directory.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use blog_cache::PageCache;
use blog_common::{hash_password, AppConfig, JwtService};
use blog_core::{
    Group, GroupRepository, Post, PostRepository, Snowflake, SnowflakeGenerator, User,
    UserRepository,
};
use blog_service::{MediaStorage, ServiceContext, ServiceContextBuilder};
use blog_web::{create_app, AppState};
use reqwest::{header::LOCATION, redirect::Policy, Client, Response};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::memory::MemoryDb;

pub const TEST_PASSWORD: &str = "not-so-secret-1";

/// Smallest valid GIF, used as an uploaded image
pub const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x00, 0x00,
    0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
];

/// Configuration for a test server; `overrides` replace the defaults
pub fn test_config(media_root: &str, overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("PORT", "0"),
        ("DATABASE_URL", "postgres://unused@localhost/unused"),
        ("SESSION_SECRET", "integration-test-secret-key"),
        ("CACHE_BACKEND", "none"),
        ("RATE_LIMIT_ENABLED", "false"),
        ("APP_ENV", "development"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    vars.insert("MEDIA_ROOT".to_string(), media_root.to_string());
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    Ok(AppConfig::from_lookup(|key| vars.get(key).cloned())?)
}

/// Service context over `db`, with media and cache taken from `config`
pub fn memory_context(
    db: &MemoryDb,
    config: &AppConfig,
    ids: Arc<SnowflakeGenerator>,
) -> Result<ServiceContext> {
    let page_cache = PageCache::from_config(&config.cache, config.redis.as_ref())?;

    Ok(ServiceContextBuilder::new()
        .user_repo(Arc::new(db.clone()))
        .group_repo(Arc::new(db.clone()))
        .post_repo(Arc::new(db.clone()))
        .comment_repo(Arc::new(db.clone()))
        .follow_repo(Arc::new(db.clone()))
        .page_cache(page_cache)
        .media(MediaStorage::from_config(&config.storage))
        .jwt_service(Arc::new(JwtService::new(
            &config.session.secret,
            config.session.ttl_secs,
        )))
        .snowflake_generator(ids)
        .posts_per_page(config.pagination.posts_per_page)
        .build()?)
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub db: MemoryDb,
    pub media: TempDir,
    ids: Arc<SnowflakeGenerator>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the page cache disabled
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start a server with configuration overrides
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self> {
        let media = TempDir::new()?;
        let config = test_config(&media.path().to_string_lossy(), overrides)?;

        let db = MemoryDb::new();
        let ids = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));
        let service_context = memory_context(&db, &config, Arc::clone(&ids))?;

        let app = create_app(AppState::new(service_context, config));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            db,
            media,
            ids,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// A browser: keeps cookies, never follows redirects
    pub fn browser(&self) -> Result<Client> {
        Ok(Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .timeout(Duration::from_secs(10))
            .build()?)
    }

    pub async fn get(&self, client: &Client, path: &str) -> Result<Response> {
        Ok(client.get(self.url(path)).send().await?)
    }

    pub async fn post_form(
        &self,
        client: &Client,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<Response> {
        Ok(client.post(self.url(path)).form(form).send().await?)
    }

    pub async fn post_multipart(
        &self,
        client: &Client,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Response> {
        Ok(client.post(self.url(path)).multipart(form).send().await?)
    }

    // ------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------

    pub async fn create_user(&self, username: &str) -> Result<User> {
        let user = User::new(self.ids.generate(), username.to_string(), None);
        UserRepository::create(&self.db, &user, &hash_password(TEST_PASSWORD)?).await?;
        Ok(user)
    }

    pub async fn create_group(&self, title: &str, slug: &str) -> Result<Group> {
        let group = Group::new(
            self.ids.generate(),
            title.to_string(),
            slug.to_string(),
            format!("About {title}"),
        );
        GroupRepository::create(&self.db, &group).await?;
        Ok(group)
    }

    pub async fn create_post(&self, author: &User, text: &str, group: Option<&Group>) -> Result<Post> {
        let post = Post::new(self.ids.generate(), author.id, text.to_string())
            .with_group(group.map(|g| g.id));
        PostRepository::create(&self.db, &post).await?;
        Ok(post)
    }

    /// A browser logged in as `user` through the login form
    pub async fn login_as(&self, user: &User) -> Result<Client> {
        let client = self.browser()?;
        let response = self
            .post_form(
                &client,
                "/auth/login/",
                &[("username", user.username.as_str()), ("password", TEST_PASSWORD)],
            )
            .await?;
        anyhow::ensure!(
            response.status() == reqwest::StatusCode::FOUND,
            "login failed with {}",
            response.status()
        );
        Ok(client)
    }

    pub fn post_path(id: Snowflake) -> String {
        format!("/posts/{id}/")
    }
}

/// `Location` header of a redirect
pub fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Number of posts rendered on a feed page
pub fn rendered_posts(body: &str) -> usize {
    body.matches("<article>").count()
}
