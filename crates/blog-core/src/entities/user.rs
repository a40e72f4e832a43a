//! User entity - an account that can author posts and follow other authors

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub email: Option<String>,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Longest accepted username
    pub const MAX_USERNAME_LEN: usize = 150;

    pub fn new(id: Snowflake, username: String, email: Option<String>) -> Self {
        Self {
            id,
            username,
            email,
            date_joined: Utc::now(),
        }
    }

    /// Usernames are letters, digits and `@ . + - _`, 1 to 150 characters
    pub fn is_valid_username(username: &str) -> bool {
        !username.is_empty()
            && username.chars().count() <= Self::MAX_USERNAME_LEN
            && username
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    }

    /// Public-facing reference used when listing posts and comments
    pub fn as_author(&self) -> Author {
        Author {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Minimal author reference joined onto posts and comments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Author {
    pub id: Snowflake,
    pub username: String,
}
