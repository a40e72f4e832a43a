//! Follow service
//!
//! Subscriptions between readers and authors. Following is idempotent and
//! following yourself silently does nothing.

use blog_core::entities::{Follow, User};
use blog_core::{DomainError, Snowflake};
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct FollowService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FollowService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Follow the author named `username`. Returns whether a new
    /// subscription was created.
    ///
    /// # Errors
    /// `UsernameNotFound` when no such author exists
    #[instrument(skip(self))]
    pub async fn follow(&self, user_id: Snowflake, username: &str) -> ServiceResult<bool> {
        let author = self.find_author(username).await?;

        let follow = Follow::new(user_id, author.id);
        if follow.is_self_follow() {
            debug!("Ignoring self-follow");
            return Ok(false);
        }

        let created = self.ctx.follow_repo().create(&follow).await?;
        if created {
            info!(user_id = %user_id, author_id = %author.id, "Followed author");
        }
        Ok(created)
    }

    /// Stop following `username`; unknown or not-followed authors are a no-op
    #[instrument(skip(self))]
    pub async fn unfollow(&self, user_id: Snowflake, username: &str) -> ServiceResult<bool> {
        let Some(author) = self.ctx.user_repo().find_by_username(username).await? else {
            return Ok(false);
        };

        let removed = self.ctx.follow_repo().delete(user_id, author.id).await?;
        if removed {
            info!(user_id = %user_id, author_id = %author.id, "Unfollowed author");
        }
        Ok(removed)
    }

    pub async fn is_following(&self, user_id: Snowflake, author_id: Snowflake) -> ServiceResult<bool> {
        Ok(self.ctx.follow_repo().exists(user_id, author_id).await?)
    }

    async fn find_author(&self, username: &str) -> ServiceResult<User> {
        Ok(self
            .ctx
            .user_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UsernameNotFound(username.to_string()))?)
    }
}
