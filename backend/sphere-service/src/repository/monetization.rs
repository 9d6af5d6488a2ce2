use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::MonetizationState;
use crate::error::AppResult;

/// Aggregated inputs for the read-time earnings projection
#[derive(Debug, Clone, Copy, Default)]
pub struct EarningsInputs {
    pub total_posts: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub total_views: i64,
    pub follower_count: i64,
}

/// Repository for the monetization columns on the user row
#[derive(Clone)]
pub struct MonetizationRepository {
    pool: PgPool,
}

impl MonetizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn state(&self, user_id: Uuid) -> AppResult<Option<MonetizationState>> {
        let state = sqlx::query_as::<_, MonetizationState>(
            r#"
            SELECT monetization_tier, monetization_active, monetization_expires_at,
                   monetization_last_reference, monetization_updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(state)
    }

    /// Write an active subscription after a verified payment
    pub async fn activate(
        &self,
        user_id: Uuid,
        tier: &str,
        expires_at: DateTime<Utc>,
        reference: &str,
    ) -> AppResult<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE users SET
                monetization_tier = $2,
                monetization_active = TRUE,
                monetization_expires_at = $3,
                monetization_last_reference = $4,
                monetization_updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(tier)
        .bind(expires_at)
        .bind(reference)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    /// Immediate deactivation: used by explicit unsubscribe and by lazy
    /// expiry correction on read.
    pub async fn deactivate(&self, user_id: Uuid) -> AppResult<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE users SET
                monetization_tier = NULL,
                monetization_active = FALSE,
                monetization_updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    /// Counter aggregates across the user's posts plus follower count,
    /// the inputs of the earnings projection and eligibility check.
    pub async fn earnings_inputs(&self, user_id: Uuid) -> AppResult<EarningsInputs> {
        let row: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(like_count), 0)::BIGINT,
                   COALESCE(SUM(comment_count), 0)::BIGINT,
                   COALESCE(SUM(view_count), 0)::BIGINT
            FROM posts
            WHERE author_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let follower_count: i64 =
            sqlx::query_scalar("SELECT follower_count FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
                .unwrap_or(0);

        Ok(EarningsInputs {
            total_posts: row.0,
            total_likes: row.1,
            total_comments: row.2,
            total_views: row.3,
            follower_count,
        })
    }

    pub async fn earnings_paid(&self, user_id: Uuid) -> AppResult<f64> {
        let paid: Option<f64> =
            sqlx::query_scalar("SELECT earnings_paid::FLOAT8 FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(paid.unwrap_or(0.0))
    }
}
