//! Repository traits (ports)

mod repositories;

pub use repositories::{
    CommentRepository, FollowRepository, GroupRepository, PostFilter, PostRepository, RepoResult,
    UserRepository,
};
