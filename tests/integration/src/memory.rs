//! In-memory repositories
//!
//! One [`MemoryDb`] implements every repository trait over shared tables,
//! with the same ordering, cascade and uniqueness rules as the Postgres
//! schema.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use blog_core::{
    Comment, CommentRepository, CommentWithAuthor, DomainError, Follow, FollowRepository, Group,
    GroupRepository, Post, PostFilter, PostRepository, PostSummary, RepoResult, Snowflake, User,
    UserRepository,
};
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<(User, String)>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
}

impl Tables {
    fn user(&self, id: Snowflake) -> Option<&User> {
        self.users.iter().map(|(user, _)| user).find(|user| user.id == id)
    }

    fn matches(&self, post: &Post, filter: PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(group_id) => post.group_id == Some(group_id),
            PostFilter::Author(author_id) => post.author_id == author_id,
            PostFilter::FollowedBy(user_id) => self
                .follows
                .iter()
                .any(|f| f.user_id == user_id && f.author_id == post.author_id),
        }
    }

    fn summary(&self, post: &Post) -> Option<PostSummary> {
        let author = self.user(post.author_id)?.as_author();
        let group = post
            .group_id
            .and_then(|id| self.groups.iter().find(|g| g.id == id))
            .map(Group::as_link);
        Some(PostSummary {
            post: post.clone(),
            author,
            group,
        })
    }
}

/// Shared in-memory store; clones see the same tables
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_count(&self) -> usize {
        self.tables.read().posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.tables.read().comments.len()
    }

    pub fn follow_count(&self) -> usize {
        self.tables.read().follows.len()
    }

    pub fn stored_post(&self, id: Snowflake) -> Option<Post> {
        self.tables.read().posts.iter().find(|p| p.id == id).cloned()
    }

    pub fn latest_post(&self) -> Option<Post> {
        self.tables
            .read()
            .posts
            .iter()
            .max_by_key(|p| (p.pub_date, p.id))
            .cloned()
    }

    /// Insert a post with an explicit publication date
    pub fn insert_post(&self, post: Post) {
        self.tables.write().posts.push(post);
    }
}

#[async_trait]
impl UserRepository for MemoryDb {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.tables.read().user(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .map(|(user, _)| user)
            .find(|user| user.username == username)
            .cloned())
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self.tables.read().users.iter().any(|(user, _)| user.username == username))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|(u, _)| u.username == user.username) {
            return Err(DomainError::UsernameTaken);
        }
        tables.users.push((user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self
            .tables
            .read()
            .users
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(_, hash)| hash.clone()))
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let removed_posts: Vec<Snowflake> = tables
            .posts
            .iter()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();

        tables.users.retain(|(user, _)| user.id != id);
        tables.posts.retain(|p| p.author_id != id);
        tables
            .comments
            .retain(|c| c.author_id != id && !removed_posts.contains(&c.post_id));
        tables.follows.retain(|f| f.user_id != id && f.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for MemoryDb {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Group>> {
        Ok(self.tables.read().groups.iter().find(|g| g.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Group>> {
        Ok(self.tables.read().groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn list(&self) -> RepoResult<Vec<Group>> {
        let mut groups = self.tables.read().groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }

    async fn create(&self, group: &Group) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if tables.groups.iter().any(|g| g.slug == group.slug) {
            return Err(DomainError::GroupSlugTaken);
        }
        tables.groups.push(group.clone());
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.write();
        tables.groups.retain(|g| g.id != id);
        for post in tables.posts.iter_mut().filter(|p| p.group_id == Some(id)) {
            post.group_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryDb {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.stored_post(id))
    }

    async fn find_summary(&self, id: Snowflake) -> RepoResult<Option<PostSummary>> {
        let tables = self.tables.read();
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| tables.summary(p)))
    }

    async fn count(&self, filter: PostFilter) -> RepoResult<u64> {
        let tables = self.tables.read();
        Ok(tables.posts.iter().filter(|p| tables.matches(p, filter)).count() as u64)
    }

    async fn list(
        &self,
        filter: PostFilter,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<PostSummary>> {
        let tables = self.tables.read();
        let mut posts: Vec<&Post> = tables.posts.iter().filter(|p| tables.matches(p, filter)).collect();
        posts.sort_by_key(|p| Reverse((p.pub_date, p.id)));

        Ok(posts
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .filter_map(|p| tables.summary(p))
            .collect())
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if tables.user(post.author_id).is_none() {
            return Err(DomainError::UserNotFound(post.author_id));
        }
        tables.posts.push(post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let stored = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(DomainError::PostNotFound(post.id))?;
        stored.text.clone_from(&post.text);
        stored.group_id = post.group_id;
        stored.image.clone_from(&post.image);
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tables = self.tables.write();
        tables.posts.retain(|p| p.id != id);
        tables.comments.retain(|c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemoryDb {
    async fn find_by_post(&self, post_id: Snowflake) -> RepoResult<Vec<CommentWithAuthor>> {
        let tables = self.tables.read();
        let mut comments: Vec<CommentWithAuthor> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .filter_map(|c| {
                tables.user(c.author_id).map(|author| CommentWithAuthor {
                    comment: c.clone(),
                    author: author.as_author(),
                })
            })
            .collect();
        comments.sort_by_key(|c| (c.comment.created, c.comment.id));
        Ok(comments)
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(DomainError::PostNotFound(comment.post_id));
        }
        tables.comments.push(comment.clone());
        Ok(())
    }

    async fn count_by_post(&self, post_id: Snowflake) -> RepoResult<u64> {
        Ok(self
            .tables
            .read()
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .count() as u64)
    }
}

#[async_trait]
impl FollowRepository for MemoryDb {
    async fn exists(&self, user_id: Snowflake, author_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .tables
            .read()
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.author_id == author_id))
    }

    async fn create(&self, follow: &Follow) -> RepoResult<bool> {
        if follow.is_self_follow() {
            return Err(DomainError::CannotFollowSelf);
        }
        let mut tables = self.tables.write();
        if tables
            .follows
            .iter()
            .any(|f| f.user_id == follow.user_id && f.author_id == follow.author_id)
        {
            return Ok(false);
        }
        tables.follows.push(follow.clone());
        Ok(true)
    }

    async fn delete(&self, user_id: Snowflake, author_id: Snowflake) -> RepoResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.follows.len();
        tables
            .follows
            .retain(|f| !(f.user_id == user_id && f.author_id == author_id));
        Ok(tables.follows.len() != before)
    }

    async fn count_followers(&self, author_id: Snowflake) -> RepoResult<u64> {
        Ok(self
            .tables
            .read()
            .follows
            .iter()
            .filter(|f| f.author_id == author_id)
            .count() as u64)
    }

    async fn count_following(&self, user_id: Snowflake) -> RepoResult<u64> {
        Ok(self
            .tables
            .read()
            .follows
            .iter()
            .filter(|f| f.user_id == user_id)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn user(id: i64, name: &str) -> User {
        User::new(Snowflake::new(id), name.to_string(), None)
    }

    #[tokio::test]
    async fn test_feed_is_newest_first() {
        let db = MemoryDb::new();
        UserRepository::create(&db, &user(1, "leo"), "hash").await.unwrap();

        let mut old = Post::new(Snowflake::new(10), Snowflake::new(1), "old".to_string());
        old.pub_date = Utc::now() - Duration::hours(1);
        db.insert_post(old);
        db.insert_post(Post::new(Snowflake::new(11), Snowflake::new(1), "new".to_string()));

        let feed = PostRepository::list(&db, PostFilter::All, 10, 0).await.unwrap();
        let texts: Vec<_> = feed.iter().map(|s| s.post.text.as_str()).collect();
        assert_eq!(texts, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_user_delete_cascades() {
        let db = MemoryDb::new();
        UserRepository::create(&db, &user(1, "leo"), "hash").await.unwrap();
        UserRepository::create(&db, &user(2, "ann"), "hash").await.unwrap();
        db.insert_post(Post::new(Snowflake::new(10), Snowflake::new(1), "p".to_string()));
        CommentRepository::create(
            &db,
            &Comment::new(Snowflake::new(20), Snowflake::new(10), Snowflake::new(2), "c".to_string()),
        )
        .await
        .unwrap();
        FollowRepository::create(&db, &Follow::new(Snowflake::new(2), Snowflake::new(1)))
            .await
            .unwrap();

        UserRepository::delete(&db, Snowflake::new(1)).await.unwrap();
        assert_eq!(db.post_count(), 0);
        assert_eq!(db.comment_count(), 0);
        assert_eq!(db.follow_count(), 0);
    }

    #[tokio::test]
    async fn test_follow_rules() {
        let db = MemoryDb::new();
        let a = Snowflake::new(1);
        let b = Snowflake::new(2);

        assert!(FollowRepository::create(&db, &Follow::new(a, b)).await.unwrap());
        assert!(!FollowRepository::create(&db, &Follow::new(a, b)).await.unwrap());
        assert!(matches!(
            FollowRepository::create(&db, &Follow::new(a, a)).await,
            Err(DomainError::CannotFollowSelf)
        ));
        assert_eq!(db.follow_count(), 1);
    }
}
