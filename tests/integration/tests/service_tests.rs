//! Service layer over the in-memory repositories
//!
//! Run with:
//! ```bash
//! cargo test -p integration-tests --test service_tests
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use blog_core::{Snowflake, SnowflakeGenerator};
use blog_service::{
    CommentForm, CommentService, FollowService, GroupService, PostForm, PostService, ServiceContext,
    ServiceError,
};
use integration_tests::{memory_context, test_config, MemoryDb};
use tempfile::TempDir;

struct Fixture {
    ctx: ServiceContext,
    db: MemoryDb,
    _media: TempDir,
}

fn fixture(per_page: &str) -> Fixture {
    let media = TempDir::new().unwrap();
    let config = test_config(
        &media.path().to_string_lossy(),
        &[("POSTS_PER_PAGE", per_page)],
    )
    .unwrap();
    let db = MemoryDb::new();
    let ctx = memory_context(&db, &config, Arc::new(SnowflakeGenerator::new(3))).unwrap();
    Fixture {
        ctx,
        db,
        _media: media,
    }
}

async fn user(ctx: &ServiceContext, name: &str) -> Snowflake {
    let form = blog_service::SignupForm::new(name, None, "long enough pass", "long enough pass");
    blog_service::AccountService::new(ctx).signup(&form).await.unwrap().id
}

// ============================================================================
// Groups
// ============================================================================

#[tokio::test]
async fn test_group_lifecycle() {
    let Fixture { ctx, db, .. } = fixture("10");
    let groups = GroupService::new(&ctx);

    let dogs = groups.create("Dogs", "dogs", "Woof").await.unwrap();
    groups.create("Cats", "cats", "Meow").await.unwrap();

    let titles: Vec<_> = groups.list().await.unwrap().into_iter().map(|g| g.title).collect();
    assert_eq!(titles, vec!["Cats", "Dogs"]);
    assert_eq!(groups.options().await.unwrap().len(), 2);

    let author = user(&ctx, "leo").await;
    let post = PostService::new(&ctx)
        .create(author, &PostForm::new("Good boy", dogs.id.to_string()))
        .await
        .unwrap();

    groups.delete("dogs").await.unwrap();
    assert_eq!(groups.list().await.unwrap().len(), 1);
    assert!(db.stored_post(post.id).unwrap().group_id.is_none());

    let err = groups.delete("dogs").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_group_validation() {
    let Fixture { ctx, .. } = fixture("10");
    let groups = GroupService::new(&ctx);

    let err = groups.create("", "not a slug", "").await.unwrap_err();
    match err {
        ServiceError::InvalidForm(errors) => {
            assert!(errors.has_field("title"));
            assert!(errors.has_field("slug"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    groups.create("Cats", "cats", "").await.unwrap();
    assert!(groups.create("More cats", "cats", "").await.is_err());
}

// ============================================================================
// Feeds and pagination
// ============================================================================

#[tokio::test]
async fn test_pages_cover_every_post_once() {
    let Fixture { ctx, .. } = fixture("4");
    let author = user(&ctx, "leo").await;
    let posts = PostService::new(&ctx);
    for n in 0..10 {
        posts.create(author, &PostForm::new(format!("post {n}"), "")).await.unwrap();
    }

    let first = posts.index(None).await.unwrap();
    assert_eq!(first.pagination.num_pages, 3);
    assert_eq!(first.pagination.total, 10);

    let mut seen = HashSet::new();
    for page in 1..=3 {
        let feed = posts.index(Some(page)).await.unwrap();
        assert!(feed.len() <= 4);
        for post in feed.items {
            assert!(seen.insert(post.id));
        }
    }
    assert_eq!(seen.len(), 10);

    assert_eq!(posts.index(Some(-2)).await.unwrap().pagination.number, 1);
    assert_eq!(posts.index(Some(50)).await.unwrap().pagination.number, 3);
}

#[tokio::test]
async fn test_profile_counts() {
    let Fixture { ctx, .. } = fixture("10");
    let author = user(&ctx, "leo").await;
    let reader = user(&ctx, "ann").await;
    PostService::new(&ctx)
        .create(author, &PostForm::new("Hello", ""))
        .await
        .unwrap();

    let follows = FollowService::new(&ctx);
    assert!(follows.follow(reader, "leo").await.unwrap());
    assert!(follows.is_following(reader, author).await.unwrap());

    let page = PostService::new(&ctx).profile("leo", Some(reader), None).await.unwrap();
    assert_eq!(page.profile.posts_count, 1);
    assert_eq!(page.profile.followers_count, 1);
    assert_eq!(page.profile.following_count, 0);
    assert!(page.profile.following);
    assert!(!page.profile.is_self);

    let own = PostService::new(&ctx).profile("leo", Some(author), None).await.unwrap();
    assert!(own.profile.is_self);
    assert!(!own.profile.following);
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn test_comment_service() {
    let Fixture { ctx, .. } = fixture("10");
    let author = user(&ctx, "leo").await;
    let post = PostService::new(&ctx)
        .create(author, &PostForm::new("Discuss", ""))
        .await
        .unwrap();
    let comments = CommentService::new(&ctx);

    let created = comments
        .add(post.id, author, &CommentForm::new(" first "))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.text, "first");

    assert!(comments.add(post.id, author, &CommentForm::new("")).await.unwrap().is_none());
    assert_eq!(comments.count(post.id).await.unwrap(), 1);

    let missing = comments
        .add(Snowflake::new(999), author, &CommentForm::new("lost"))
        .await
        .unwrap_err();
    assert!(missing.is_not_found());

    let detail = PostService::new(&ctx).detail(post.id, None).await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.author_posts_count, 1);
    assert!(!detail.can_edit);
}
