//! Post pages
//!
//! Feeds, profiles, post detail, the create/edit form, comments and
//! subscriptions.

use axum::{
    extract::{OriginalUri, Path, State},
    response::{Html, IntoResponse, Response},
};
use blog_cache::page_key;
use blog_service::{
    dto::PostFormView, CommentService, EditAccess, FollowService, GroupService, PostService,
    ServiceError,
};
use minijinja::context;
use tracing::warn;

use crate::extractors::{
    CommentFormData, MaybeUser, PageNumber, PostFormData, PostId, RequireUser,
};
use crate::handlers::render_page;
use crate::response::{found, WebResult};
use crate::state::AppState;

fn profile_url(username: &str) -> String {
    format!("/profile/{username}/")
}

fn post_url(post_id: impl std::fmt::Display) -> String {
    format!("/posts/{post_id}/")
}

/// Home page feed, served from the page cache when possible
///
/// GET /
pub async fn index(
    State(state): State<AppState>,
    user: MaybeUser,
    PageNumber(page): PageNumber,
    OriginalUri(uri): OriginalUri,
) -> WebResult<Html<String>> {
    let ctx = state.service_context();
    let cache = ctx.page_cache();
    let key = page_key(uri.path_and_query().map_or("/", |pq| pq.as_str()), user.id());

    match cache.get(&key).await {
        Ok(Some(body)) => return Ok(Html(body)),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Page cache read failed"),
    }

    let page_obj = PostService::new(ctx).index(page).await?;
    let Html(body) = render_page(
        "posts/index.html",
        &user,
        context! { page_obj, view_name => "index" },
    )?;

    if let Err(e) = cache.set(&key, &body).await {
        warn!(error = %e, "Page cache write failed");
    }
    Ok(Html(body))
}

/// Posts of one group
///
/// GET /group/{slug}/
pub async fn group_posts(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(slug): Path<String>,
    PageNumber(page): PageNumber,
) -> WebResult<Html<String>> {
    let group_page = PostService::new(state.service_context())
        .group_feed(&slug, page)
        .await?;

    render_page(
        "posts/group_list.html",
        &user,
        context! { group => group_page.group, page_obj => group_page.page, hide_group => true },
    )
}

/// Author profile
///
/// GET /profile/{username}/
pub async fn profile(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(username): Path<String>,
    PageNumber(page): PageNumber,
) -> WebResult<Html<String>> {
    let profile_page = PostService::new(state.service_context())
        .profile(&username, user.id(), page)
        .await?;

    render_page(
        "posts/profile.html",
        &user,
        context! { profile => profile_page.profile, page_obj => profile_page.page },
    )
}

/// Single post with comments
///
/// GET /posts/{post_id}/
pub async fn post_detail(
    State(state): State<AppState>,
    user: MaybeUser,
    PostId(post_id): PostId,
) -> WebResult<Html<String>> {
    let detail = PostService::new(state.service_context())
        .detail(post_id, user.id())
        .await?;

    render_page("posts/post_detail.html", &user, context! { detail })
}

async fn render_post_form(state: &AppState, user: MaybeUser, form: PostFormView) -> WebResult<Html<String>> {
    let groups = GroupService::new(state.service_context()).options().await?;
    render_page("posts/create_post.html", &user, context! { form, groups })
}

/// Empty post form
///
/// GET /create/
pub async fn post_create_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> WebResult<Html<String>> {
    render_post_form(&state, MaybeUser(Some(user)), PostFormView::blank()).await
}

/// Publish a post, then go to the author's profile
///
/// POST /create/
pub async fn post_create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    PostFormData(form): PostFormData,
) -> WebResult<Response> {
    match PostService::new(state.service_context()).create(user.id, &form).await {
        Ok(_) => Ok(found(&profile_url(&user.username))),
        Err(ServiceError::InvalidForm(errors)) => {
            let view = PostFormView::from_submission(&form, errors);
            Ok(render_post_form(&state, MaybeUser(Some(user)), view).await?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Edit form prefilled from the post; other users go to the author's profile
///
/// GET /posts/{post_id}/edit/
pub async fn post_edit_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    PostId(post_id): PostId,
) -> WebResult<Response> {
    let access = PostService::new(state.service_context())
        .edit_access(post_id, user.id)
        .await?;

    match access {
        EditAccess::Author(post) => {
            let view = PostFormView::from_post(&post);
            Ok(render_post_form(&state, MaybeUser(Some(user)), view).await?.into_response())
        }
        EditAccess::NotAuthor { author_username } => Ok(found(&profile_url(&author_username))),
    }
}

/// Save an edit, then go back to the post
///
/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    PostId(post_id): PostId,
    PostFormData(form): PostFormData,
) -> WebResult<Response> {
    let service = PostService::new(state.service_context());

    let post = match service.edit_access(post_id, user.id).await? {
        EditAccess::Author(post) => post,
        EditAccess::NotAuthor { author_username } => {
            return Ok(found(&profile_url(&author_username)));
        }
    };

    match service.update(post.clone(), &form).await {
        Ok(updated) => Ok(found(&post_url(updated.id))),
        Err(ServiceError::InvalidForm(errors)) => {
            let view = PostFormView::from_submission(&form, errors).editing(&post);
            Ok(render_post_form(&state, MaybeUser(Some(user)), view).await?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Add a comment; invalid comments are dropped silently
///
/// POST /posts/{post_id}/comment/
pub async fn add_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    PostId(post_id): PostId,
    CommentFormData(form): CommentFormData,
) -> WebResult<Response> {
    CommentService::new(state.service_context())
        .add(post_id, user.id, &form)
        .await?;
    Ok(found(&post_url(post_id)))
}

/// Posts of followed authors
///
/// GET /follow/
pub async fn follow_index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    PageNumber(page): PageNumber,
) -> WebResult<Html<String>> {
    let page_obj = PostService::new(state.service_context())
        .follow_feed(user.id, page)
        .await?;

    render_page(
        "posts/follow.html",
        &MaybeUser(Some(user)),
        context! { page_obj, view_name => "follow_index" },
    )
}

/// GET /profile/{username}/follow/
pub async fn profile_follow(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(username): Path<String>,
) -> WebResult<Response> {
    FollowService::new(state.service_context())
        .follow(user.id, &username)
        .await?;
    Ok(found(&profile_url(&username)))
}

/// GET /profile/{username}/unfollow/
pub async fn profile_unfollow(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(username): Path<String>,
) -> WebResult<Response> {
    FollowService::new(state.service_context())
        .unfollow(user.id, &username)
        .await?;
    Ok(found(&profile_url(&username)))
}
