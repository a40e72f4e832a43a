//! Route definitions

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use crate::handlers::{self, auth, health, posts};
use crate::state::AppState;

/// Page routes plus the 404 fallback. Health routes are kept apart so they
/// bypass rate limiting.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(post_routes())
        .merge(auth_routes())
        .fallback(handlers::not_found)
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Uploaded images under `/media/`
pub fn media_routes(media_root: &std::path::Path) -> Router<AppState> {
    Router::new().nest_service("/media", ServeDir::new(media_root))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::index))
        .route("/group/:slug/", get(posts::group_posts))
        .route("/profile/:username/", get(posts::profile))
        .route("/profile/:username/follow/", get(posts::profile_follow))
        .route("/profile/:username/unfollow/", get(posts::profile_unfollow))
        .route("/posts/:post_id/", get(posts::post_detail))
        .route(
            "/posts/:post_id/edit/",
            get(posts::post_edit_form).post(posts::post_edit),
        )
        .route("/posts/:post_id/comment/", axum::routing::post(posts::add_comment))
        .route(
            "/create/",
            get(posts::post_create_form).post(posts::post_create),
        )
        .route("/follow/", get(posts::follow_index))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup/", get(auth::signup_form).post(auth::signup))
        .route("/auth/login/", get(auth::login_form).post(auth::login))
        .route("/auth/logout/", get(auth::logout))
}
