//! Service context - dependency container for services

use std::sync::Arc;

use blog_cache::PageCache;
use blog_common::JwtService;
use blog_core::traits::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};
use blog_core::{Snowflake, SnowflakeGenerator};
use blog_db::PgPool;

use super::error::{ServiceError, ServiceResult};
use crate::media::MediaStorage;

/// Posts shown per feed page unless configured otherwise
pub const DEFAULT_POSTS_PER_PAGE: u32 = 10;

/// Everything a service needs: repositories, the page cache, media storage,
/// session signing and id generation.
///
/// The database pool is optional so the services can run over in-memory
/// repositories in tests.
#[derive(Clone)]
pub struct ServiceContext {
    pool: Option<PgPool>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    group_repo: Arc<dyn GroupRepository>,
    post_repo: Arc<dyn PostRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    follow_repo: Arc<dyn FollowRepository>,

    page_cache: PageCache,
    media: MediaStorage,

    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    posts_per_page: u32,
}

impl ServiceContext {
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn group_repo(&self) -> &dyn GroupRepository {
        self.group_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn follow_repo(&self) -> &dyn FollowRepository {
        self.follow_repo.as_ref()
    }

    // === Infrastructure ===

    pub fn page_cache(&self) -> &PageCache {
        &self.page_cache
    }

    pub fn media(&self) -> &MediaStorage {
        &self.media
    }

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn posts_per_page(&self) -> u32 {
        self.posts_per_page
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    /// Round-trip to PostgreSQL; trivially healthy without a pool
    pub async fn check_database(&self) -> ServiceResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1")
                .execute(pool)
                .await
                .map_err(|e| ServiceError::internal(format!("database unreachable: {e}")))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("page_cache", &self.page_cache)
            .field("media", &self.media)
            .field("posts_per_page", &self.posts_per_page)
            .finish()
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    group_repo: Option<Arc<dyn GroupRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    follow_repo: Option<Arc<dyn FollowRepository>>,
    page_cache: Option<PageCache>,
    media: Option<MediaStorage>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    posts_per_page: Option<u32>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn group_repo(mut self, repo: Arc<dyn GroupRepository>) -> Self {
        self.group_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn follow_repo(mut self, repo: Arc<dyn FollowRepository>) -> Self {
        self.follow_repo = Some(repo);
        self
    }

    /// Defaults to a disabled cache
    pub fn page_cache(mut self, cache: PageCache) -> Self {
        self.page_cache = Some(cache);
        self
    }

    pub fn media(mut self, media: MediaStorage) -> Self {
        self.media = Some(media);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn posts_per_page(mut self, per_page: u32) -> Self {
        self.posts_per_page = Some(per_page);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            pool: self.pool,
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            group_repo: self
                .group_repo
                .ok_or_else(|| ServiceError::validation("group_repo is required"))?,
            post_repo: self
                .post_repo
                .ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            comment_repo: self
                .comment_repo
                .ok_or_else(|| ServiceError::validation("comment_repo is required"))?,
            follow_repo: self
                .follow_repo
                .ok_or_else(|| ServiceError::validation("follow_repo is required"))?,
            page_cache: self.page_cache.unwrap_or_else(PageCache::disabled),
            media: self
                .media
                .ok_or_else(|| ServiceError::validation("media is required"))?,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            snowflake_generator: self
                .snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
            posts_per_page: self
                .posts_per_page
                .unwrap_or(DEFAULT_POSTS_PER_PAGE)
                .max(1),
        })
    }
}
