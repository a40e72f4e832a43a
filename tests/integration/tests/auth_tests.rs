//! Sign up, log in and log out
//!
//! Run with:
//! ```bash
//! cargo test -p integration-tests --test auth_tests
//! ```

use integration_tests::{location, TestServer, TEST_PASSWORD};
use reqwest::StatusCode;

#[tokio::test]
async fn test_signup_logs_in() {
    let server = TestServer::start().await.unwrap();
    let client = server.browser().unwrap();

    let response = server.get(&client, "/auth/signup/").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = server
        .post_form(
            &client,
            "/auth/signup/",
            &[
                ("username", "newcomer"),
                ("email", "newcomer@example.com"),
                ("password1", "long enough pass"),
                ("password2", "long enough pass"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/"));

    let cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let body = server.get(&client, "/").await.unwrap().text().await.unwrap();
    assert!(body.contains("/profile/newcomer/"));
    assert!(body.contains("Log out"));

    let response = server.get(&client, "/create/").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_errors() {
    let server = TestServer::start().await.unwrap();
    let client = server.browser().unwrap();
    server.create_user("taken").await.unwrap();

    let response = server
        .post_form(
            &client,
            "/auth/signup/",
            &[
                ("username", "taken"),
                ("password1", "long enough pass"),
                ("password2", "long enough pass"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("A user with that username already exists."));

    let response = server
        .post_form(
            &client,
            "/auth/signup/",
            &[
                ("username", "fresh"),
                ("password1", "long enough pass"),
                ("password2", "different pass!!"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("password fields didn"));
    assert!(body.contains("value=\"fresh\""));

    let response = server
        .post_form(
            &client,
            "/auth/signup/",
            &[("username", "digits"), ("password1", "12345678901"), ("password2", "12345678901")],
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("entirely numeric"));
}

#[tokio::test]
async fn test_login_form_keeps_next() {
    let server = TestServer::start().await.unwrap();
    let client = server.browser().unwrap();

    let response = server.get(&client, "/auth/login/?next=%2Fcreate%2F").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("name=\"next\""));
    assert!(body.contains("create"));
}

#[tokio::test]
async fn test_login_redirects_to_next() {
    let server = TestServer::start().await.unwrap();
    let client = server.browser().unwrap();
    server.create_user("leo").await.unwrap();

    let response = server
        .post_form(
            &client,
            "/auth/login/",
            &[("username", "leo"), ("password", TEST_PASSWORD), ("next", "/follow/")],
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/follow/"));

    let response = server.get(&client, "/follow/").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_ignores_external_next() {
    let server = TestServer::start().await.unwrap();
    let client = server.browser().unwrap();
    server.create_user("leo").await.unwrap();

    let response = server
        .post_form(
            &client,
            "/auth/login/",
            &[("username", "leo"), ("password", TEST_PASSWORD), ("next", "//evil.example/")],
        )
        .await
        .unwrap();
    assert_eq!(location(&response).as_deref(), Some("/"));
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let server = TestServer::start().await.unwrap();
    let client = server.browser().unwrap();
    server.create_user("leo").await.unwrap();

    let response = server
        .post_form(&client, "/auth/login/", &[("username", "leo"), ("password", "wrong")])
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Please enter a correct username and password"));

    let response = server.get(&client, "/create/").await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_logout() {
    let server = TestServer::start().await.unwrap();
    let user = server.create_user("leo").await.unwrap();
    let client = server.login_as(&user).await.unwrap();

    assert_eq!(server.get(&client, "/create/").await.unwrap().status(), StatusCode::OK);

    let response = server.get(&client, "/auth/logout/").await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/"));

    let response = server.get(&client, "/create/").await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_tampered_session_is_anonymous() {
    let server = TestServer::start().await.unwrap();
    let client = server.browser().unwrap();

    let response = client
        .get(server.url("/create/"))
        .header(reqwest::header::COOKIE, "session=not.a.token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/auth/login/?next=%2Fcreate%2F"));
}
