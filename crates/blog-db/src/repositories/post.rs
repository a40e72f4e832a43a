//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blog_core::entities::{Post, PostSummary};
use blog_core::error::DomainError;
use blog_core::traits::{PostFilter, PostRepository, RepoResult};
use blog_core::value_objects::Snowflake;

use crate::mappers::count_to_u64;
use crate::models::{PostModel, PostSummaryModel};

use super::error::map_db_error;

const SUMMARY_SELECT: &str = r"
    SELECT p.id, p.text, p.pub_date, p.author_id, p.group_id, p.image,
           u.username AS author_username,
           g.slug AS group_slug, g.title AS group_title
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN post_groups g ON g.id = p.group_id
";

/// WHERE clause for a feed filter, using `$1` for its argument, plus that argument
fn filter_clause(filter: PostFilter) -> (&'static str, Option<i64>) {
    match filter {
        PostFilter::All => ("", None),
        PostFilter::Group(id) => ("WHERE p.group_id = $1", Some(id.into_inner())),
        PostFilter::Author(id) => ("WHERE p.author_id = $1", Some(id.into_inner())),
        PostFilter::FollowedBy(id) => (
            "WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = $1)",
            Some(id.into_inner()),
        ),
    }
}

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(
            r"
            SELECT id, text, pub_date, author_id, group_id, image
            FROM posts
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn find_summary(&self, id: Snowflake) -> RepoResult<Option<PostSummary>> {
        let sql = format!("{SUMMARY_SELECT} WHERE p.id = $1");
        let result = sqlx::query_as::<_, PostSummaryModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(PostSummary::from))
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: PostFilter) -> RepoResult<u64> {
        let (clause, arg) = filter_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM posts p {clause}");

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(arg) = arg {
            query = query.bind(arg);
        }
        let count = query.fetch_one(&self.pool).await.map_err(map_db_error)?;

        Ok(count_to_u64(count))
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: PostFilter,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<PostSummary>> {
        let (clause, arg) = filter_clause(filter);
        let first = if arg.is_some() { 2 } else { 1 };
        let sql = format!(
            "{SUMMARY_SELECT} {clause} ORDER BY p.pub_date DESC, p.id DESC LIMIT ${first} OFFSET ${}",
            first + 1
        );

        let mut query = sqlx::query_as::<_, PostSummaryModel>(&sql);
        if let Some(arg) = arg {
            query = query.bind(arg);
        }
        let rows = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(PostSummary::from).collect())
    }

    #[instrument(skip(self, post), fields(post_id = %post.id, author_id = %post.author_id))]
    async fn create(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posts (id, text, pub_date, author_id, group_id, image)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(post.id.into_inner())
        .bind(&post.text)
        .bind(post.pub_date)
        .bind(post.author_id.into_inner())
        .bind(post.group_id.map(Snowflake::into_inner))
        .bind(&post.image)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, post), fields(post_id = %post.id))]
    async fn update(&self, post: &Post) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET text = $2, group_id = $3, image = $4
            WHERE id = $1
            ",
        )
        .bind(post.id.into_inner())
        .bind(&post.text)
        .bind(post.group_id.map(Snowflake::into_inner))
        .bind(&post.image)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(post.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(id));
        }

        Ok(())
    }
}
