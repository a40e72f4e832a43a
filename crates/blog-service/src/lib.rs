//! # blog-service
//!
//! Application layer: the use cases behind every page, form validation,
//! uploaded media storage and the view models templates render.

pub mod dto;
pub mod forms;
pub mod media;
pub mod services;

pub use forms::{
    CommentForm, FormErrors, GroupChoice, LoginForm, PostForm, SignupForm, UploadedFile,
};
pub use media::{MediaError, MediaStorage};
pub use services::{
    AccountService, CommentService, EditAccess, FollowService, GroupService, PostService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
