//! Entity to view mappers

use blog_core::entities::{
    Author, Comment, CommentWithAuthor, Group, GroupLink, Post, PostSummary, User,
};

use super::responses::{
    AuthorView, CommentView, CurrentUser, GroupLinkView, GroupOption, GroupView, PostFormView,
    PostView, DATE_FORMAT,
};
use crate::forms::{FormErrors, PostForm};
use crate::media::MediaStorage;

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            username: author.username,
        }
    }
}

impl From<&User> for AuthorView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

impl From<&Group> for GroupView {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            title: group.title.clone(),
            slug: group.slug.clone(),
            description: group.description.clone(),
        }
    }
}

impl From<&Group> for GroupOption {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            title: group.title.clone(),
        }
    }
}

impl From<GroupLink> for GroupLinkView {
    fn from(link: GroupLink) -> Self {
        Self {
            slug: link.slug,
            title: link.title,
        }
    }
}

impl From<PostSummary> for PostView {
    fn from(summary: PostSummary) -> Self {
        let PostSummary { post, author, group } = summary;
        Self {
            id: post.id,
            preview: post.preview().to_string(),
            pub_date: post.pub_date.format(DATE_FORMAT).to_string(),
            image_url: post.image.as_deref().map(MediaStorage::url),
            text: post.text,
            author: author.into(),
            group: group.map(Into::into),
        }
    }
}

impl From<CommentWithAuthor> for CommentView {
    fn from(row: CommentWithAuthor) -> Self {
        let CommentWithAuthor { comment, author } = row;
        let Comment { id, text, created, .. } = comment;
        Self {
            id,
            text,
            created: created.format(DATE_FORMAT).to_string(),
            author: author.into(),
        }
    }
}

impl PostFormView {
    /// Empty create form
    pub fn blank() -> Self {
        Self::default()
    }

    /// Edit form prefilled from a stored post
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()).unwrap_or_default(),
            image_url: post.image.as_deref().map(MediaStorage::url),
            is_edit: true,
            post_id: Some(post.id),
            errors: FormErrors::new(),
        }
    }

    /// Re-display of a submitted form next to its errors
    pub fn from_submission(form: &PostForm, errors: FormErrors) -> Self {
        Self {
            text: form.text.clone(),
            group: form.group.clone(),
            errors,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn editing(mut self, post: &Post) -> Self {
        self.is_edit = true;
        self.post_id = Some(post.id);
        self.image_url = post.image.as_deref().map(MediaStorage::url);
        self
    }
}
