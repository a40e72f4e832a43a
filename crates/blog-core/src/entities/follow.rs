//! Follow entity - directed subscription from a user to an author

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Follow edge; unique per (user, author) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Follow {
    /// The follower
    pub user_id: Snowflake,
    /// The followed author
    pub author_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    pub fn new(user_id: Snowflake, author_id: Snowflake) -> Self {
        Self {
            user_id,
            author_id,
            created_at: Utc::now(),
        }
    }

    /// A user may not subscribe to themselves
    #[inline]
    pub fn is_self_follow(&self) -> bool {
        self.user_id == self.author_id
    }
}
