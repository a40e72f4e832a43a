//! Writing pages: creating and editing posts, comments and subscriptions
//!
//! Run with:
//! ```bash
//! cargo test -p integration-tests --test posts_tests
//! ```

use integration_tests::{location, rendered_posts, TestServer, SMALL_GIF};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

fn post_form(text: &str, group: &str) -> Form {
    Form::new()
        .text("text", text.to_string())
        .text("group", group.to_string())
}

fn gif_part(name: &str) -> Part {
    Part::bytes(SMALL_GIF.to_vec())
        .file_name(name.to_string())
        .mime_str("image/gif")
        .unwrap()
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_anonymous_create_redirects_to_login() {
    let server = TestServer::start().await.unwrap();
    let client = server.browser().unwrap();

    let response = server.get(&client, "/create/").await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/auth/login/?next=%2Fcreate%2F"));

    let response = server
        .post_multipart(&client, "/create/", post_form("Sneaky", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(server.db.post_count(), 0);
}

#[tokio::test]
async fn test_create_form_lists_groups() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let group = server.create_group("Cats", "cats").await.unwrap();
    let client = server.login_as(&author).await.unwrap();

    let response = server.get(&client, "/create/").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains(&format!("<option value=\"{}\">Cats</option>", group.id)));
    assert!(body.contains("enctype=\"multipart/form-data\""));
}

#[tokio::test]
async fn test_create_post_with_group_and_image() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let group = server.create_group("Cats", "cats").await.unwrap();
    let client = server.login_as(&author).await.unwrap();

    let form = post_form("  Brand new post  ", &group.id.to_string()).part("image", gif_part("small.gif"));
    let response = server.post_multipart(&client, "/create/", form).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/profile/leo/"));

    let post = server.db.latest_post().unwrap();
    assert_eq!(post.text, "Brand new post");
    assert_eq!(post.author_id, author.id);
    assert_eq!(post.group_id, Some(group.id));

    let image = post.image.unwrap();
    assert!(image.starts_with("posts/"));
    assert!(server.media.path().join(&image).exists());

    let served = server.get(&client, &format!("/media/{image}")).await.unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await.unwrap().as_ref(), SMALL_GIF);

    let group_page = server.get(&client, "/group/cats/").await.unwrap().text().await.unwrap();
    assert_eq!(rendered_posts(&group_page), 1);
    assert!(group_page.contains("<img"));
}

#[tokio::test]
async fn test_same_image_name_twice_keeps_both_files() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let client = server.login_as(&author).await.unwrap();

    for text in ["one", "two"] {
        let form = post_form(text, "").part("image", gif_part("small.gif"));
        let response = server.post_multipart(&client, "/create/", form).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    let files = std::fs::read_dir(server.media.path().join("posts")).unwrap().count();
    assert_eq!(files, 2);
}

#[tokio::test]
async fn test_long_image_name_is_shortened() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let client = server.login_as(&author).await.unwrap();

    let long_name = format!("{}.gif", "a".repeat(300));
    let form = post_form("Long file name", "").part("image", gif_part(&long_name));
    let response = server.post_multipart(&client, "/create/", form).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(server.db.post_count(), 1);
    let image = server.db.latest_post().unwrap().image.unwrap();
    assert!(image.len() <= 100);
    assert!(image.starts_with("posts/a"));
    assert!(image.ends_with(".gif"));
    assert!(server.media.path().join(&image).exists());
}

#[tokio::test]
async fn test_create_invalid_form_rerenders() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let client = server.login_as(&author).await.unwrap();

    let response = server
        .post_multipart(&client, "/create/", post_form("   ", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("This field is required."));

    let response = server
        .post_multipart(&client, "/create/", post_form("Valid text", "123456"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Select a valid choice"));
    assert!(body.contains("Valid text"));

    assert_eq!(server.db.post_count(), 0);
}

#[tokio::test]
async fn test_create_rejects_non_image_upload() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let client = server.login_as(&author).await.unwrap();

    let fake = Part::bytes(b"definitely not an image".to_vec())
        .file_name("notes.gif")
        .mime_str("image/gif")
        .unwrap();
    let response = server
        .post_multipart(&client, "/create/", post_form("With a bad file", "").part("image", fake))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Upload a valid image"));
    assert_eq!(server.db.post_count(), 0);
    assert!(!server.media.path().join("posts").join("notes.gif").exists());
}

// ============================================================================
// Edit
// ============================================================================

#[tokio::test]
async fn test_author_edits_post() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let post = server.create_post(&author, "Original", None).await.unwrap();
    let client = server.login_as(&author).await.unwrap();
    let edit_path = format!("/posts/{}/edit/", post.id);

    let response = server.get(&client, &edit_path).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Original"));

    let response = server
        .post_multipart(&client, &edit_path, post_form("Edited", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some(TestServer::post_path(post.id)));

    let stored = server.db.stored_post(post.id).unwrap();
    assert_eq!(stored.text, "Edited");
    assert_eq!(stored.pub_date, post.pub_date);
    assert_eq!(server.db.post_count(), 1);
}

#[tokio::test]
async fn test_author_clears_image() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let client = server.login_as(&author).await.unwrap();

    let form = post_form("Picture", "").part("image", gif_part("small.gif"));
    server.post_multipart(&client, "/create/", form).await.unwrap();
    let post = server.db.latest_post().unwrap();
    let image = post.image.clone().unwrap();

    let form = post_form("Picture", "").text("image-clear", "on");
    let response = server
        .post_multipart(&client, &format!("/posts/{}/edit/", post.id), form)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    assert!(server.db.stored_post(post.id).unwrap().image.is_none());
    assert!(!server.media.path().join(image).exists());
}

#[tokio::test]
async fn test_non_author_cannot_edit() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let intruder = server.create_user("mallory").await.unwrap();
    let post = server.create_post(&author, "Mine", None).await.unwrap();
    let client = server.login_as(&intruder).await.unwrap();
    let edit_path = format!("/posts/{}/edit/", post.id);

    let response = server.get(&client, &edit_path).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/profile/leo/"));

    let response = server
        .post_multipart(&client, &edit_path, post_form("Hijacked", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/profile/leo/"));
    assert_eq!(server.db.stored_post(post.id).unwrap().text, "Mine");
}

#[tokio::test]
async fn test_edit_missing_post_is_404() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let client = server.login_as(&author).await.unwrap();

    let response = server.get(&client, "/posts/424242/edit/").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detail_shows_edit_link_to_author_only() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let reader = server.create_user("ann").await.unwrap();
    let post = server.create_post(&author, "Text", None).await.unwrap();
    let path = TestServer::post_path(post.id);

    let as_author = server.login_as(&author).await.unwrap();
    let body = server.get(&as_author, &path).await.unwrap().text().await.unwrap();
    assert!(body.contains("edit post"));

    let as_reader = server.login_as(&reader).await.unwrap();
    let body = server.get(&as_reader, &path).await.unwrap().text().await.unwrap();
    assert!(!body.contains("edit post"));
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comments() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let reader = server.create_user("ann").await.unwrap();
    let post = server.create_post(&author, "Discuss", None).await.unwrap();
    let comment_path = format!("/posts/{}/comment/", post.id);

    let anonymous = server.browser().unwrap();
    let response = server
        .post_form(&anonymous, &comment_path, &[("text", "Anonymous says hi")])
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).unwrap().starts_with("/auth/login/?next="));
    assert_eq!(server.db.comment_count(), 0);

    let client = server.login_as(&reader).await.unwrap();
    let response = server
        .post_form(&client, &comment_path, &[("text", "Great post")])
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some(TestServer::post_path(post.id)));
    assert_eq!(server.db.comment_count(), 1);

    let response = server.post_form(&client, &comment_path, &[("text", "  ")]).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(server.db.comment_count(), 1);

    let body = server
        .get(&client, &TestServer::post_path(post.id))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Great post"));
    assert!(body.contains("/profile/ann/"));
}

#[tokio::test]
async fn test_comment_with_wrong_body_renders_error_page() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let post = server.create_post(&author, "Discuss", None).await.unwrap();
    let client = server.login_as(&author).await.unwrap();

    let response = client
        .post(server.url(&format!("/posts/{}/comment/", post.id)))
        .json(&serde_json::json!({ "text": "Not a form" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(response.text().await.unwrap().contains("Error 400"));
    assert_eq!(server.db.comment_count(), 0);
}

#[tokio::test]
async fn test_comment_on_missing_post_is_404() {
    let server = TestServer::start().await.unwrap();
    let reader = server.create_user("ann").await.unwrap();
    let client = server.login_as(&reader).await.unwrap();

    let response = server
        .post_form(&client, "/posts/31337/comment/", &[("text", "Hello?")])
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Follows
// ============================================================================

#[tokio::test]
async fn test_follow_and_unfollow() {
    let server = TestServer::start().await.unwrap();
    server.create_user("leo").await.unwrap();
    let reader = server.create_user("ann").await.unwrap();
    let client = server.login_as(&reader).await.unwrap();

    let response = server.get(&client, "/profile/leo/follow/").await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/profile/leo/"));
    assert_eq!(server.db.follow_count(), 1);

    server.get(&client, "/profile/leo/follow/").await.unwrap();
    assert_eq!(server.db.follow_count(), 1);

    let body = server.get(&client, "/profile/leo/").await.unwrap().text().await.unwrap();
    assert!(body.contains("Unsubscribe"));
    assert!(body.contains("Followers: 1"));

    let response = server.get(&client, "/profile/leo/unfollow/").await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/profile/leo/"));
    assert_eq!(server.db.follow_count(), 0);
}

#[tokio::test]
async fn test_cannot_follow_self() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let client = server.login_as(&author).await.unwrap();

    let response = server.get(&client, "/profile/leo/follow/").await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(server.db.follow_count(), 0);
}

#[tokio::test]
async fn test_follow_unknown_author() {
    let server = TestServer::start().await.unwrap();
    let reader = server.create_user("ann").await.unwrap();
    let client = server.login_as(&reader).await.unwrap();

    let response = server.get(&client, "/profile/ghost/follow/").await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server.get(&client, "/profile/ghost/unfollow/").await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn test_follow_feed_shows_followed_authors_only() {
    let server = TestServer::start().await.unwrap();
    let author = server.create_user("leo").await.unwrap();
    let stranger = server.create_user("stranger").await.unwrap();
    let reader = server.create_user("ann").await.unwrap();
    let lurker = server.create_user("lurker").await.unwrap();
    server.create_post(&author, "Followed post", None).await.unwrap();
    server.create_post(&stranger, "Stranger post", None).await.unwrap();

    let client = server.login_as(&reader).await.unwrap();
    server.get(&client, "/profile/leo/follow/").await.unwrap();

    let response = server.get(&client, "/follow/").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Followed post"));
    assert!(!body.contains("Stranger post"));

    let other = server.login_as(&lurker).await.unwrap();
    let body = server.get(&other, "/follow/").await.unwrap().text().await.unwrap();
    assert_eq!(rendered_posts(&body), 0);

    let anonymous = server.browser().unwrap();
    let response = server.get(&anonymous, "/follow/").await.unwrap();
    assert_eq!(location(&response).as_deref(), Some("/auth/login/?next=%2Ffollow%2F"));
}
