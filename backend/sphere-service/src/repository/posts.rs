use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::{Audience, Post};
use crate::error::{AppError, AppResult};

const POST_COLUMNS: &str = "id, author_id, body, media_urls, audience, circle_id, \
     like_count, repost_count, bookmark_count, comment_count, view_count, created_at";

/// Repository for post documents and their denormalized counters
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a post with zeroed counters
    pub async fn create_post(
        &self,
        author_id: Uuid,
        body: &str,
        media_urls: &[String],
        audience: Audience,
        circle_id: Option<Uuid>,
    ) -> AppResult<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (id, author_id, body, media_urls, audience, circle_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(body)
        .bind(media_urls)
        .bind(audience.as_str())
        .bind(circle_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    pub async fn get_post(&self, post_id: Uuid) -> AppResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// Increment the view counter and return the new value
    pub async fn record_view(&self, post_id: Uuid) -> AppResult<i64> {
        let count: Option<i64> = sqlx::query_scalar(
            "UPDATE posts SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        count.ok_or(AppError::NotFound("post"))
    }

    /// Delete a post; the caller has already checked ownership
    pub async fn delete_post(&self, post_id: Uuid) -> AppResult<bool> {
        let affected = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    /// Global feed: audience in (global, both), newest first
    pub async fn list_global(&self, limit: i64, offset: i64) -> AppResult<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE audience IN ('global', 'both')
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Circle feed: matching circle AND audience in (circle, both), newest first
    pub async fn list_circle(
        &self,
        circle_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE circle_id = $1 AND audience IN ('circle', 'both')
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(circle_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Posts authored by a user, newest first
    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE author_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }
}
