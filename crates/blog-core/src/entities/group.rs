//! Group entity - a named category posts may optionally belong to

use crate::value_objects::Snowflake;

/// Post group (community)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: Snowflake,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    pub const MAX_TITLE_LEN: usize = 200;
    pub const MAX_SLUG_LEN: usize = 50;

    pub fn new(id: Snowflake, title: String, slug: String, description: String) -> Self {
        Self {
            id,
            title,
            slug,
            description,
        }
    }

    /// Slugs are ASCII letters, digits, hyphens and underscores
    pub fn is_valid_slug(slug: &str) -> bool {
        !slug.is_empty()
            && slug.len() <= Self::MAX_SLUG_LEN
            && slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn as_link(&self) -> GroupLink {
        GroupLink {
            id: self.id,
            slug: self.slug.clone(),
            title: self.title.clone(),
        }
    }
}

/// Group reference joined onto a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLink {
    pub id: Snowflake,
    pub slug: String,
    pub title: String,
}
