//! View models handed to templates
//!
//! - Response views serialised into the template context
//! - Mappers converting domain entities into those views

pub mod mappers;
pub mod responses;

pub use responses::{
    AuthorView, CommentView, CurrentUser, GroupLinkView, GroupOption, GroupPage, GroupView,
    HealthChecks, HealthResponse, PaginatedResponse, PaginationMeta, PostDetailView,
    PostFormView, PostView, ProfilePage, ProfileView, ReadinessResponse,
};
