//! Comment entity - a reply left under a post

use chrono::{DateTime, Utc};

use super::user::Author;
use crate::value_objects::Snowflake;

/// Comment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub author_id: Snowflake,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl Comment {
    pub fn new(id: Snowflake, post_id: Snowflake, author_id: Snowflake, text: String) -> Self {
        Self {
            id,
            post_id,
            author_id,
            text,
            created: Utc::now(),
        }
    }
}

/// Comment joined with its author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: Author,
}
