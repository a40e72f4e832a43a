//! Session extractors
//!
//! The session cookie holds a signed token naming the user. A missing,
//! tampered or expired cookie is an anonymous visitor, never an error.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use blog_common::SessionConfig;
use blog_service::{dto::CurrentUser, AccountService};

use crate::response::{login_redirect, WebError};
use crate::state::AppState;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Build the session cookie for a freshly issued token
pub fn session_cookie(token: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookie)
        .max_age(time::Duration::seconds(config.ttl_secs))
        .build()
}

/// The logged-in user, if any
#[derive(Debug, Clone, Default)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
    pub fn id(&self) -> Option<blog_core::Snowflake> {
        self.0.as_ref().map(|user| user.id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(resolved) = parts.extensions.get::<MaybeUser>() {
            return Ok(resolved.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(Self(None));
        };

        let app_state = AppState::from_ref(state);
        let user = AccountService::new(app_state.service_context())
            .resolve_session(cookie.value())
            .await?;

        let resolved = Self(user);
        parts.extensions.insert(resolved.clone());
        Ok(resolved)
    }
}

/// A logged-in user; anonymous visitors are redirected to the login page
#[derive(Debug, Clone)]
pub struct RequireUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        match user {
            Some(user) => Ok(Self(user)),
            None => {
                let uri = parts
                    .extensions
                    .get::<OriginalUri>()
                    .map_or(&parts.uri, |original| &original.0);
                let next = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
                tracing::debug!(next, "Anonymous request to a login-only page");
                Err(login_redirect(next))
            }
        }
    }
}
