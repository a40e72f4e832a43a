//! Post entity - a published text entry with optional group and image

use chrono::{DateTime, Utc};

use super::group::GroupLink;
use super::user::Author;
use crate::value_objects::Snowflake;

/// Post entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Snowflake,
    pub group_id: Option<Snowflake>,
    /// Media path relative to the upload root, e.g. `posts/small.gif`
    pub image: Option<String>,
}

impl Post {
    /// Characters shown by [`Post::preview`]
    pub const PREVIEW_LEN: usize = 15;

    pub fn new(id: Snowflake, author_id: Snowflake, text: String) -> Self {
        Self {
            id,
            text,
            pub_date: Utc::now(),
            author_id,
            group_id: None,
            image: None,
        }
    }

    #[must_use]
    pub fn with_group(mut self, group_id: Option<Snowflake>) -> Self {
        self.group_id = group_id;
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    #[inline]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// First few characters of the text, used in page titles and logs
    pub fn preview(&self) -> &str {
        match self.text.char_indices().nth(Self::PREVIEW_LEN) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }
}

/// Post joined with its author and group, as listed in every feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub post: Post,
    pub author: Author,
    pub group: Option<GroupLink>,
}
