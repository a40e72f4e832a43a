//! Views rendered by the HTML templates and the health endpoints
//!
//! Snowflake IDs are serialised as strings; dates are pre-formatted so the
//! templates stay free of formatting logic.

use blog_core::{Page, Snowflake};
use serde::Serialize;

use crate::forms::FormErrors;

/// Display format for publication dates, e.g. `19 October 2026`
pub const DATE_FORMAT: &str = "%-d %B %Y";

// ============================================================================
// Pagination
// ============================================================================

/// One page of a feed
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Page numbers for the paginator include
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub number: u32,
    pub num_pages: u32,
    pub total: u64,
    pub per_page: u32,
    pub has_previous: bool,
    pub has_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_number: Option<u32>,
    pub start_index: u64,
    pub page_range: Vec<u32>,
}

impl<T> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        let pagination = PaginationMeta {
            number: page.number,
            num_pages: page.num_pages,
            total: page.total,
            per_page: page.per_page,
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            previous_page_number: page.previous_page_number(),
            next_page_number: page.next_page_number(),
            start_index: page.start_index(),
            page_range: page.page_range().collect(),
        };
        Self {
            items: page.items,
            pagination,
        }
    }
}

impl<T> PaginatedResponse<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Users
// ============================================================================

/// Logged-in user as resolved from the session cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub id: Snowflake,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorView {
    pub id: Snowflake,
    pub username: String,
}

/// Author header of a profile page
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub author: AuthorView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub date_joined: String,
    pub posts_count: u64,
    pub followers_count: u64,
    pub following_count: u64,
    /// The viewer follows this author
    pub following: bool,
    /// The viewer is this author
    pub is_self: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub profile: ProfileView,
    pub page: PaginatedResponse<PostView>,
}

// ============================================================================
// Groups
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupView {
    pub id: Snowflake,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupLinkView {
    pub slug: String,
    pub title: String,
}

/// Entry in the post form's group select box
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupOption {
    pub id: Snowflake,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupPage {
    pub group: GroupView,
    pub page: PaginatedResponse<PostView>,
}

// ============================================================================
// Posts and comments
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub id: Snowflake,
    pub text: String,
    /// First characters of the text, used as the page title
    pub preview: String,
    pub pub_date: String,
    pub author: AuthorView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupLinkView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub id: Snowflake,
    pub text: String,
    pub created: String,
    pub author: AuthorView,
}

/// Everything the single post page shows
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailView {
    pub post: PostView,
    pub author_posts_count: u64,
    pub comments: Vec<CommentView>,
    /// The viewer wrote this post
    pub can_edit: bool,
}

/// State of the create/edit form as shown to the user
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostFormView {
    pub text: String,
    /// Selected group id, empty for none
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Snowflake>,
    pub errors: FormErrors,
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: bool,
    pub cache: bool,
}

impl ReadinessResponse {
    pub fn new(checks: HealthChecks) -> Self {
        let status = if checks.database && checks.cache {
            "ready"
        } else {
            "degraded"
        };
        Self { status, checks }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
