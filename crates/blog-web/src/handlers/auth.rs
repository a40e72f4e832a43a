//! Account pages: sign up, log in, log out

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use blog_core::User;
use blog_service::{AccountService, FormErrors, LoginForm, ServiceError, SignupForm};
use minijinja::context;
use serde::Deserialize;

use crate::extractors::{session_cookie, MaybeUser, SESSION_COOKIE};
use crate::handlers::render_page;
use crate::response::{found, safe_next, WebResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignupInput {
    #[serde(default)]
    username: String,
    email: Option<String>,
    #[serde(default)]
    password1: String,
    #[serde(default)]
    password2: String,
}

/// Attach a fresh session for `user` and redirect
fn start_session(state: &AppState, jar: CookieJar, user: &User, location: &str) -> WebResult<Response> {
    let token = AccountService::new(state.service_context()).session_token(user)?;
    let jar = jar.add(session_cookie(token, &state.config().session));
    Ok((jar, found(location)).into_response())
}

/// GET /auth/signup/
pub async fn signup_form(user: MaybeUser) -> WebResult<Html<String>> {
    render_page(
        "users/signup.html",
        &user,
        context! { errors => FormErrors::new(), username => "", email => "" },
    )
}

/// Create the account and log it in
///
/// POST /auth/signup/
pub async fn signup(
    State(state): State<AppState>,
    user: MaybeUser,
    jar: CookieJar,
    Form(input): Form<SignupInput>,
) -> WebResult<Response> {
    let form = SignupForm::new(input.username, input.email, input.password1, input.password2);

    match AccountService::new(state.service_context()).signup(&form).await {
        Ok(created) => start_session(&state, jar, &created, "/"),
        Err(ServiceError::InvalidForm(errors)) => Ok(render_page(
            "users/signup.html",
            &user,
            context! { errors, username => form.username, email => form.email.unwrap_or_default() },
        )?
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// GET /auth/login/
pub async fn login_form(user: MaybeUser, Query(query): Query<NextQuery>) -> WebResult<Html<String>> {
    render_page(
        "users/login.html",
        &user,
        context! {
            errors => FormErrors::new(),
            username => "",
            next => query.next.unwrap_or_default(),
        },
    )
}

/// Check credentials and go to `next`, or the home page
///
/// POST /auth/login/
pub async fn login(
    State(state): State<AppState>,
    user: MaybeUser,
    jar: CookieJar,
    Form(input): Form<LoginInput>,
) -> WebResult<Response> {
    let form = LoginForm::new(input.username, input.password);

    match AccountService::new(state.service_context()).login(&form).await {
        Ok(account) => start_session(&state, jar, &account, safe_next(input.next.as_deref())),
        Err(ServiceError::InvalidForm(errors)) => Ok(render_page(
            "users/login.html",
            &user,
            context! { errors, username => form.username, next => input.next.unwrap_or_default() },
        )?
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// GET /auth/logout/
pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, found("/")).into_response()
}
