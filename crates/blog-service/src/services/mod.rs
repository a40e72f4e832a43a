//! Use cases behind the pages

pub mod account;
pub mod comment;
pub mod context;
pub mod error;
pub mod follow;
pub mod group;
pub mod post;

pub use account::AccountService;
pub use comment::CommentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use follow::FollowService;
pub use group::GroupService;
pub use post::{EditAccess, PostService};
