//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs; `blog-db` provides the Postgres
//! implementation and the integration tests provide an in-memory one.

use async_trait::async_trait;

use crate::entities::{Comment, CommentWithAuthor, Follow, Group, Post, PostSummary, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Which posts a feed shows. Every feed is ordered newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post on the site
    All,
    /// Posts filed under a group
    Group(Snowflake),
    /// Posts written by a user
    Author(Snowflake),
    /// Posts by every author the given user follows
    FollowedBy(Snowflake),
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Check if username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Delete a user together with their posts, comments and follows
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Group Repository
// ============================================================================

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Group>>;

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Group>>;

    /// All groups ordered by title, for the post form's select box
    async fn list(&self) -> RepoResult<Vec<Group>>;

    async fn create(&self, group: &Group) -> RepoResult<()>;

    /// Delete a group; its posts stay and lose their group
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    /// Find a post joined with its author and group
    async fn find_summary(&self, id: Snowflake) -> RepoResult<Option<PostSummary>>;

    /// Number of posts matching the filter
    async fn count(&self, filter: PostFilter) -> RepoResult<u64>;

    /// One window of the filtered feed, newest first
    async fn list(&self, filter: PostFilter, limit: i64, offset: i64)
        -> RepoResult<Vec<PostSummary>>;

    async fn create(&self, post: &Post) -> RepoResult<()>;

    /// Overwrite text, group and image; author and pub_date never change
    async fn update(&self, post: &Post) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments under a post, oldest first
    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<CommentWithAuthor>>;

    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    async fn count_by_post(&self, post_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Follow Repository
// ============================================================================

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Check if `user_id` follows `author_id`
    async fn exists(&self, user_id: Snowflake, author_id: Snowflake) -> RepoResult<bool>;

    /// Insert the edge if missing. Returns `false` when it already existed.
    async fn create(&self, follow: &Follow) -> RepoResult<bool>;

    /// Remove the edge if present. Returns `false` when there was nothing to remove.
    async fn delete(&self, user_id: Snowflake, author_id: Snowflake) -> RepoResult<bool>;

    /// How many users follow the author
    async fn count_followers(&self, author_id: Snowflake) -> RepoResult<u64>;

    /// How many authors the user follows
    async fn count_following(&self, user_id: Snowflake) -> RepoResult<u64>;
}
