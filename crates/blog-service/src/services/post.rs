//! Post service
//!
//! Feeds (index, group, profile, follow), the single post page and the
//! create/edit use cases.

use blog_core::entities::{Post, PostSummary};
use blog_core::{DomainError, Paginator, PostFilter, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::responses::DATE_FORMAT;
use crate::dto::{
    AuthorView, CommentView, GroupPage, GroupView, PaginatedResponse, PostDetailView, PostView,
    ProfilePage, ProfileView,
};
use crate::forms::{GroupChoice, PostForm};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Who may edit a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAccess {
    /// The requesting user wrote the post
    Author(Post),
    /// Someone else wrote it; they are sent to the author's profile
    NotAuthor { author_username: String },
}

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// All posts, newest first
    #[instrument(skip(self))]
    pub async fn index(&self, page: Option<i64>) -> ServiceResult<PaginatedResponse<PostView>> {
        self.feed(PostFilter::All, page).await
    }

    /// Posts of one group
    #[instrument(skip(self))]
    pub async fn group_feed(&self, slug: &str, page: Option<i64>) -> ServiceResult<GroupPage> {
        let group = self
            .ctx
            .group_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(slug.to_string()))?;

        let page = self.feed(PostFilter::Group(group.id), page).await?;
        Ok(GroupPage {
            group: GroupView::from(&group),
            page,
        })
    }

    /// Author page with follow state for the viewer
    #[instrument(skip(self))]
    pub async fn profile(
        &self,
        username: &str,
        viewer: Option<Snowflake>,
        page: Option<i64>,
    ) -> ServiceResult<ProfilePage> {
        let author = self
            .ctx
            .user_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UsernameNotFound(username.to_string()))?;

        let page = self.feed(PostFilter::Author(author.id), page).await?;
        let follows = self.ctx.follow_repo();
        let following = match viewer {
            Some(viewer_id) if viewer_id != author.id => follows.exists(viewer_id, author.id).await?,
            _ => false,
        };

        let profile = ProfileView {
            author: AuthorView::from(&author),
            email: author.email.clone(),
            date_joined: author.date_joined.format(DATE_FORMAT).to_string(),
            posts_count: page.pagination.total,
            followers_count: follows.count_followers(author.id).await?,
            following_count: follows.count_following(author.id).await?,
            following,
            is_self: viewer == Some(author.id),
        };
        Ok(ProfilePage { profile, page })
    }

    /// Posts by authors `user_id` follows
    #[instrument(skip(self))]
    pub async fn follow_feed(
        &self,
        user_id: Snowflake,
        page: Option<i64>,
    ) -> ServiceResult<PaginatedResponse<PostView>> {
        self.feed(PostFilter::FollowedBy(user_id), page).await
    }

    /// Single post with its comments
    #[instrument(skip(self))]
    pub async fn detail(
        &self,
        post_id: Snowflake,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<PostDetailView> {
        let summary = self.find_summary(post_id).await?;
        let author_id = summary.author.id;

        let author_posts_count = self.ctx.post_repo().count(PostFilter::Author(author_id)).await?;
        let comments = self
            .ctx
            .comment_repo()
            .find_by_post(post_id)
            .await?
            .into_iter()
            .map(CommentView::from)
            .collect();

        Ok(PostDetailView {
            post: PostView::from(summary),
            author_posts_count,
            comments,
            can_edit: viewer == Some(author_id),
        })
    }

    /// Validate the form and publish a post as `author_id`
    #[instrument(skip(self, form))]
    pub async fn create(&self, author_id: Snowflake, form: &PostForm) -> ServiceResult<Post> {
        let group_id = self.clean(form).await?;

        let image = match &form.image {
            Some(file) => Some(self.ctx.media().save(file).await?),
            None => None,
        };

        let post = Post::new(self.ctx.generate_id(), author_id, form.cleaned_text())
            .with_group(group_id)
            .with_image(image);

        if let Err(e) = self.ctx.post_repo().create(&post).await {
            self.discard_image(post.image.as_deref()).await;
            return Err(e.into());
        }

        info!(post_id = %post.id, author_id = %author_id, preview = post.preview(), "Post created");
        Ok(post)
    }

    /// Decide whether `user_id` may edit the post
    #[instrument(skip(self))]
    pub async fn edit_access(
        &self,
        post_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<EditAccess> {
        let post = self.find_post(post_id).await?;
        if post.is_author(user_id) {
            return Ok(EditAccess::Author(post));
        }

        let author = self
            .ctx
            .user_repo()
            .find_by_id(post.author_id)
            .await?
            .ok_or(DomainError::UserNotFound(post.author_id))?;
        Ok(EditAccess::NotAuthor {
            author_username: author.username,
        })
    }

    /// Apply a validated edit to a post obtained through [`Self::edit_access`]
    #[instrument(skip(self, post, form), fields(post_id = %post.id))]
    pub async fn update(&self, mut post: Post, form: &PostForm) -> ServiceResult<Post> {
        let group_id = self.clean(form).await?;

        let previous_image = post.image.clone();
        let replaced = match &form.image {
            Some(file) => {
                post.image = Some(self.ctx.media().save(file).await?);
                true
            }
            None if form.clear_image => {
                post.image = None;
                true
            }
            None => false,
        };

        post.text = form.cleaned_text();
        post.group_id = group_id;

        if let Err(e) = self.ctx.post_repo().update(&post).await {
            if form.image.is_some() {
                self.discard_image(post.image.as_deref()).await;
            }
            return Err(e.into());
        }

        if replaced {
            self.discard_image(previous_image.as_deref()).await;
        }

        info!(post_id = %post.id, "Post updated");
        Ok(post)
    }

    /// Field checks plus the group lookup. Returns the chosen group.
    async fn clean(&self, form: &PostForm) -> ServiceResult<Option<Snowflake>> {
        let mut errors = form.check();

        let group_id = match form.group_choice() {
            GroupChoice::Id(id) => {
                if self.ctx.group_repo().find_by_id(id).await?.is_none() {
                    errors.add("group", PostForm::INVALID_CHOICE);
                }
                Some(id)
            }
            GroupChoice::None | GroupChoice::Invalid => None,
        };

        if let Some(file) = &form.image {
            if let Err(e) = self.ctx.media().validate(file) {
                errors.add("image", e.to_string());
            }
        }

        errors.into_result()?;
        Ok(group_id)
    }

    async fn feed(
        &self,
        filter: PostFilter,
        page: Option<i64>,
    ) -> ServiceResult<PaginatedResponse<PostView>> {
        let posts = self.ctx.post_repo();
        let paginator = Paginator::new(posts.count(filter).await?, self.ctx.posts_per_page());
        let window = paginator.window(page);
        let items = posts.list(filter, window.limit, window.offset).await?;
        Ok(paginator.page(window, items).map(PostView::from).into())
    }

    async fn find_post(&self, post_id: Snowflake) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::from(DomainError::PostNotFound(post_id)))
    }

    async fn find_summary(&self, post_id: Snowflake) -> ServiceResult<PostSummary> {
        self.ctx
            .post_repo()
            .find_summary(post_id)
            .await?
            .ok_or_else(|| ServiceError::from(DomainError::PostNotFound(post_id)))
    }

    async fn discard_image(&self, path: Option<&str>) {
        if let Some(path) = path {
            if let Err(e) = self.ctx.media().delete(path).await {
                warn!(error = %e, path, "Failed to remove stored image");
            }
        }
    }
}
