use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::models::{Circle, CircleDeleteRequest, CircleMember};
use crate::error::{AppError, AppResult};

/// Repository for circles, membership rows and deletion requests
#[derive(Clone)]
pub struct CircleRepository {
    pool: PgPool,
}

impl CircleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a circle; the creator becomes its sole member and admin.
    pub async fn create_circle(&self, name: &str, tag: &str, creator_id: Uuid) -> AppResult<Circle> {
        let mut tx = self.pool.begin().await?;

        let circle = sqlx::query_as::<_, Circle>(
            r#"
            INSERT INTO circles (id, name, tag, creator_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, tag, creator_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(tag)
        .bind(creator_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO circle_members (circle_id, user_id, is_admin) VALUES ($1, $2, TRUE)",
        )
        .bind(circle.id)
        .bind(creator_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(circle)
    }

    pub async fn get_circle(&self, circle_id: Uuid) -> AppResult<Option<Circle>> {
        let circle = sqlx::query_as::<_, Circle>(
            "SELECT id, name, tag, creator_id, created_at FROM circles WHERE id = $1",
        )
        .bind(circle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(circle)
    }

    pub async fn list_circles(&self, limit: i64, offset: i64) -> AppResult<Vec<Circle>> {
        let circles = sqlx::query_as::<_, Circle>(
            r#"
            SELECT id, name, tag, creator_id, created_at
            FROM circles
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(circles)
    }

    /// Idempotent join as a plain member
    pub async fn join(&self, circle_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let inserted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO circle_members (circle_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (circle_id, user_id) DO NOTHING
            RETURNING circle_id
            "#,
        )
        .bind(circle_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }

    pub async fn member(&self, circle_id: Uuid, user_id: Uuid) -> AppResult<Option<CircleMember>> {
        let member = sqlx::query_as::<_, CircleMember>(
            r#"
            SELECT circle_id, user_id, is_admin, joined_at
            FROM circle_members
            WHERE circle_id = $1 AND user_id = $2
            "#,
        )
        .bind(circle_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    pub async fn members(&self, circle_id: Uuid) -> AppResult<Vec<CircleMember>> {
        let members = sqlx::query_as::<_, CircleMember>(
            r#"
            SELECT circle_id, user_id, is_admin, joined_at
            FROM circle_members
            WHERE circle_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(circle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    pub async fn remove_member(&self, circle_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let affected = sqlx::query(
            "DELETE FROM circle_members WHERE circle_id = $1 AND user_id = $2",
        )
        .bind(circle_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    /// Demote an admin to a plain member
    pub async fn demote_admin(&self, circle_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let affected = sqlx::query(
            "UPDATE circle_members SET is_admin = FALSE WHERE circle_id = $1 AND user_id = $2",
        )
        .bind(circle_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    pub async fn promote_admin(&self, circle_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let affected = sqlx::query(
            "UPDATE circle_members SET is_admin = TRUE WHERE circle_id = $1 AND user_id = $2",
        )
        .bind(circle_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    /// Delete a circle; membership rows, posts scoped to it and its
    /// deletion requests cascade.
    pub async fn delete_circle(&self, circle_id: Uuid) -> AppResult<bool> {
        let affected = sqlx::query("DELETE FROM circles WHERE id = $1")
            .bind(circle_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    /// Create a pending deletion request. The partial unique index allows
    /// at most one open request per circle.
    pub async fn create_delete_request(
        &self,
        circle_id: Uuid,
        requested_by: Uuid,
    ) -> AppResult<CircleDeleteRequest> {
        let request = sqlx::query_as::<_, CircleDeleteRequest>(
            r#"
            INSERT INTO circle_delete_requests (id, circle_id, requested_by)
            VALUES ($1, $2, $3)
            RETURNING id, circle_id, requested_by, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(circle_id)
        .bind(requested_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::BadRequest("a deletion request is already pending".into())
            }
            _ => AppError::from(e),
        })?;

        Ok(request)
    }

    pub async fn get_request(&self, request_id: Uuid) -> AppResult<Option<CircleDeleteRequest>> {
        let request = sqlx::query_as::<_, CircleDeleteRequest>(
            r#"
            SELECT id, circle_id, requested_by, status, created_at
            FROM circle_delete_requests
            WHERE id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// Pending requests across circles created by this user
    pub async fn pending_requests_for_creator(
        &self,
        creator_id: Uuid,
    ) -> AppResult<Vec<CircleDeleteRequest>> {
        let requests = sqlx::query_as::<_, CircleDeleteRequest>(
            r#"
            SELECT r.id, r.circle_id, r.requested_by, r.status, r.created_at
            FROM circle_delete_requests r
            JOIN circles c ON c.id = r.circle_id
            WHERE c.creator_id = $1 AND r.status = 'pending'
            ORDER BY r.created_at ASC
            "#,
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Mark a request rejected; the row persists for the audit trail.
    pub async fn reject_request(&self, request_id: Uuid) -> AppResult<bool> {
        let affected = sqlx::query(
            "UPDATE circle_delete_requests SET status = 'rejected' WHERE id = $1 AND status = 'pending'",
        )
        .bind(request_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }
}
