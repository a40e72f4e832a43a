//! # blog-core
//!
//! Domain layer for the blog: users, groups, posts, comments and follows,
//! the repository traits that persist them, and the pagination rules shared
//! by every feed. Nothing here knows about SQL, HTTP or templates.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Author, Comment, CommentWithAuthor, Follow, Group, GroupLink, Post, PostSummary, User};
pub use error::DomainError;
pub use traits::{
    CommentRepository, FollowRepository, GroupRepository, PostFilter, PostRepository, RepoResult,
    UserRepository,
};
pub use value_objects::{
    Page, PageWindow, Paginator, Snowflake, SnowflakeGenerator, SnowflakeParseError,
};
