//! Comment service

use blog_core::entities::Comment;
use blog_core::{DomainError, Snowflake};
use tracing::{info, instrument, warn};

use crate::forms::CommentForm;

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a comment to a post.
    ///
    /// An invalid form is not an error: nothing is stored and `None` is
    /// returned, the caller goes back to the post either way.
    #[instrument(skip(self, form))]
    pub async fn add(
        &self,
        post_id: Snowflake,
        author_id: Snowflake,
        form: &CommentForm,
    ) -> ServiceResult<Option<Comment>> {
        if self.ctx.post_repo().find_by_id(post_id).await?.is_none() {
            return Err(DomainError::PostNotFound(post_id).into());
        }

        let errors = form.check();
        if !errors.is_empty() {
            warn!(post_id = %post_id, errors = %errors.summary(), "Discarding invalid comment");
            return Ok(None);
        }

        let comment = Comment::new(self.ctx.generate_id(), post_id, author_id, form.cleaned_text());
        self.ctx.comment_repo().create(&comment).await?;

        info!(comment_id = %comment.id, post_id = %post_id, "Comment added");
        Ok(Some(comment))
    }

    pub async fn count(&self, post_id: Snowflake) -> ServiceResult<u64> {
        Ok(self.ctx.comment_repo().count_by_post(post_id).await?)
    }
}
