//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("No user named {0}")]
    UsernameNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Post not found: {0}")]
    PostNotFound(Snowflake),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("A user with that username already exists")]
    UsernameTaken,

    #[error("Group slug already in use")]
    GroupSlugTaken,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Cannot follow yourself")]
    CannotFollowSelf,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for logs and error pages
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) | Self::UsernameNotFound(_) => "UNKNOWN_USER",
            Self::GroupNotFound(_) => "UNKNOWN_GROUP",
            Self::PostNotFound(_) => "UNKNOWN_POST",

            // Conflict
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::GroupSlugTaken => "GROUP_SLUG_TAKEN",

            // Business Rules
            Self::CannotFollowSelf => "CANNOT_FOLLOW_SELF",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::UsernameNotFound(_)
                | Self::GroupNotFound(_)
                | Self::PostNotFound(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UsernameTaken | Self::GroupSlugTaken)
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_conflict() {
            409
        } else if matches!(self, Self::CannotFollowSelf) {
            400
        } else {
            500
        }
    }
}
