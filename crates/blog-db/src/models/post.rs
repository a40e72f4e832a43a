//! Post database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

/// Post joined with its author's username and its group, if any
#[derive(Debug, Clone, FromRow)]
pub struct PostSummaryModel {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<String>,
    pub author_username: String,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
}
