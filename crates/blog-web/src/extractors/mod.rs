//! Request extractors
//!
//! - [`MaybeUser`] / [`RequireUser`]: the session cookie's user
//! - [`PageNumber`]: the `?page=` query parameter
//! - [`PostId`]: a post identifier from the path
//! - [`PostFormData`]: the multipart post form
//! - [`CommentFormData`]: the comment form

mod comment_form;
mod page;
mod path;
mod post_form;
mod session;

pub use comment_form::CommentFormData;
pub use page::PageNumber;
pub use path::PostId;
pub use post_form::PostFormData;
pub use session::{session_cookie, MaybeUser, RequireUser, SESSION_COOKIE};
