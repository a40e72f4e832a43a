//! Database models - SQLx-compatible structs for PostgreSQL rows

mod comment;
mod group;
mod post;
mod user;

pub use comment::{CommentModel, CommentWithAuthorModel};
pub use group::GroupModel;
pub use post::{PostModel, PostSummaryModel};
pub use user::UserModel;
