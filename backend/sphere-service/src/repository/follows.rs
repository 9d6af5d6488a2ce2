use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// Repository for the follow graph.
///
/// One edge row serves both lookup directions; the denormalized
/// follower/following counters on both user rows are adjusted in the same
/// transaction as the edge write, so a partial application cannot occur.
#[derive(Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent follow; returns true if a new edge was created.
    /// Counters are only adjusted when the edge actually changed.
    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let inserted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO follows (follower_id, followee_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            RETURNING follower_id
            "#,
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_optional(&mut *tx)
        .await?;

        let created = inserted.is_some();
        if created {
            sqlx::query("UPDATE users SET follower_count = follower_count + 1 WHERE id = $1")
                .bind(followee_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE users SET following_count = following_count + 1 WHERE id = $1")
                .bind(follower_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Idempotent unfollow; returns true if an edge was removed.
    pub async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            "DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2",
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let removed = affected > 0;
        if removed {
            sqlx::query(
                "UPDATE users SET follower_count = GREATEST(follower_count - 1, 0) WHERE id = $1",
            )
            .bind(followee_id)
            .execute(&mut *tx)
            .await?;
            sqlx::query(
                "UPDATE users SET following_count = GREATEST(following_count - 1, 0) WHERE id = $1",
            )
            .bind(follower_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(removed)
    }

    pub async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2)",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Users following `user_id`, newest first
    pub async fn followers(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Uuid>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE followee_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT follower_id FROM follows
            WHERE followee_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((ids, total))
    }

    /// Users `user_id` follows, newest first
    pub async fn following(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Uuid>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT followee_id FROM follows
            WHERE follower_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((ids, total))
    }
}
