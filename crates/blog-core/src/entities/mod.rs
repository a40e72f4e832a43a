//! Domain entities - core business objects

mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::{Comment, CommentWithAuthor};
pub use follow::Follow;
pub use group::{Group, GroupLink};
pub use post::{Post, PostSummary};
pub use user::{Author, User};
