use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::Comment;
use crate::error::{AppError, AppResult};

/// Repository for comments and the denormalized comment_count on posts
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a comment (or a reply when parent_comment_id is set) and bump
    /// the post's comment_count in the same transaction.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        parent_comment_id: Option<Uuid>,
        body: &str,
    ) -> AppResult<Comment> {
        let mut tx = self.pool.begin().await?;

        let post_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
                .bind(post_id)
                .fetch_one(&mut *tx)
                .await?;
        if !post_exists {
            return Err(AppError::NotFound("post"));
        }

        if let Some(parent_id) = parent_comment_id {
            let parent_ok: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1 AND post_id = $2)",
            )
            .bind(parent_id)
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;
            if !parent_ok {
                return Err(AppError::NotFound("parent comment"));
            }
        }

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, user_id, parent_comment_id, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, post_id, user_id, parent_comment_id, body, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(user_id)
        .bind(parent_comment_id)
        .bind(body)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(comment)
    }

    /// Delete own comment and decrement the post's comment_count (clamped).
    ///
    /// The FK cascade removes the whole reply tree with the comment, so
    /// the counter drops by the thread size, not by one.
    pub async fn delete_comment(&self, comment_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Uuid, Uuid)> =
            sqlx::query_as("SELECT post_id, user_id FROM comments WHERE id = $1")
                .bind(comment_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((post_id, author)) = row else {
            return Err(AppError::NotFound("comment"));
        };
        if author != user_id {
            return Err(AppError::Forbidden(
                "only the comment author may delete it".into(),
            ));
        }

        let thread_size: i64 = sqlx::query_scalar(
            r#"
            WITH RECURSIVE thread AS (
                SELECT id FROM comments WHERE id = $1
                UNION ALL
                SELECT c.id FROM comments c JOIN thread t ON c.parent_comment_id = t.id
            )
            SELECT COUNT(*) FROM thread
            "#,
        )
        .bind(comment_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE posts SET comment_count = GREATEST(comment_count - $2, 0) WHERE id = $1",
        )
        .bind(post_id)
        .bind(thread_size)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Comments for a post, oldest first
    pub async fn list_comments(&self, post_id: Uuid) -> AppResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, user_id, parent_comment_id, body, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
