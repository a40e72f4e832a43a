//! Comment model -> entity mappers

use blog_core::entities::{Author, Comment, CommentWithAuthor};
use blog_core::value_objects::Snowflake;

use crate::models::{CommentModel, CommentWithAuthorModel};

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            post_id: Snowflake::new(model.post_id),
            author_id: Snowflake::new(model.author_id),
            text: model.text,
            created: model.created,
        }
    }
}

impl From<CommentWithAuthorModel> for CommentWithAuthor {
    fn from(model: CommentWithAuthorModel) -> Self {
        let comment = Comment::from(model.comment);
        CommentWithAuthor {
            author: Author {
                id: comment.author_id,
                username: model.author_username,
            },
            comment,
        }
    }
}
