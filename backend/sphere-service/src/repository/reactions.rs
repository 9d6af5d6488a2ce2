use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::models::{BookmarkEntry, ReactionKind, ReactionSummary, RepostedPost, ToggleOutcome};
use crate::error::{AppError, AppResult};

/// Repository for the per-(post, user) reaction ledgers and the
/// denormalized counters on the parent post.
///
/// Row existence in the ledger is the sole source of truth for "has this
/// user reacted"; the counter and the ledger are always mutated in one
/// transaction so they cannot drift in either direction. Decrements clamp
/// at zero.
#[derive(Clone)]
pub struct ReactionRepository {
    pool: PgPool,
}

impl ReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Toggle one reaction kind for (post, user).
    ///
    /// Returns the resulting ledger state and the post's new counter value
    /// so optimistic callers can reconcile without a follow-up read.
    pub async fn toggle(
        &self,
        kind: ReactionKind,
        post_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<ToggleOutcome> {
        let mut tx = self.pool.begin().await?;

        // Lock the parent post for the duration of the toggle; this
        // serializes concurrent counter updates on the same post.
        let post: Option<(Uuid, Uuid)> =
            sqlx::query_as("SELECT id, author_id FROM posts WHERE id = $1 FOR UPDATE")
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((_, author_id)) = post else {
            return Err(AppError::NotFound("post"));
        };

        let table = ledger_table(kind);
        let counter = counter_column(kind);

        let existing: Option<(Uuid,)> = sqlx::query_as(&format!(
            "SELECT user_id FROM {table} WHERE post_id = $1 AND user_id = $2"
        ))
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = if existing.is_some() {
            sqlx::query(&format!(
                "DELETE FROM {table} WHERE post_id = $1 AND user_id = $2"
            ))
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

            let count: i64 = sqlx::query_scalar(&format!(
                "UPDATE posts SET {counter} = GREATEST({counter} - 1, 0) \
                 WHERE id = $1 RETURNING {counter}"
            ))
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;

            ToggleOutcome {
                active: false,
                count,
            }
        } else {
            self.insert_ledger_entry(&mut tx, kind, post_id, user_id, author_id)
                .await?;

            let count: i64 = sqlx::query_scalar(&format!(
                "UPDATE posts SET {counter} = {counter} + 1 WHERE id = $1 RETURNING {counter}"
            ))
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;

            ToggleOutcome {
                active: true,
                count,
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn insert_ledger_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: ReactionKind,
        post_id: Uuid,
        user_id: Uuid,
        author_id: Uuid,
    ) -> AppResult<()> {
        match kind {
            ReactionKind::Heart => {
                sqlx::query("INSERT INTO likes (post_id, user_id) VALUES ($1, $2)")
                    .bind(post_id)
                    .bind(user_id)
                    .execute(&mut **tx)
                    .await?;
            }
            ReactionKind::Repost => {
                // Snapshot the reposter's display name so repost listings
                // survive later profile edits.
                let display_name: String =
                    sqlx::query_scalar("SELECT display_name FROM users WHERE id = $1")
                        .bind(user_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .unwrap_or_default();

                sqlx::query(
                    r#"
                    INSERT INTO reposts (post_id, user_id, original_author_id, reposted_by_display_name)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(post_id)
                .bind(user_id)
                .bind(author_id)
                .bind(display_name)
                .execute(&mut **tx)
                .await?;
            }
            ReactionKind::Bookmark => {
                sqlx::query(
                    r#"
                    INSERT INTO bookmarks (post_id, user_id, cached_body, cached_media_urls)
                    SELECT id, $2, body, media_urls FROM posts WHERE id = $1
                    "#,
                )
                .bind(post_id)
                .bind(user_id)
                .execute(&mut **tx)
                .await?;
            }
        }
        Ok(())
    }

    /// Check a single ledger for (post, user)
    pub async fn has_reacted(
        &self,
        kind: ReactionKind,
        post_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<bool> {
        let table = ledger_table(kind);
        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE post_id = $1 AND user_id = $2)"
        ))
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// All three ledgers for (post, user) in one round trip
    pub async fn summary(&self, post_id: Uuid, user_id: Uuid) -> AppResult<ReactionSummary> {
        let (liked, reposted, bookmarked): (bool, bool, bool) = sqlx::query_as(
            r#"
            SELECT
                EXISTS(SELECT 1 FROM likes WHERE post_id = $1 AND user_id = $2),
                EXISTS(SELECT 1 FROM reposts WHERE post_id = $1 AND user_id = $2),
                EXISTS(SELECT 1 FROM bookmarks WHERE post_id = $1 AND user_id = $2)
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ReactionSummary {
            liked,
            reposted,
            bookmarked,
        })
    }

    /// Posts a user has reposted, newest repost first
    pub async fn user_reposts(&self, user_id: Uuid) -> AppResult<Vec<RepostedPost>> {
        let reposts = sqlx::query_as::<_, RepostedPost>(
            r#"
            SELECT r.post_id, r.user_id AS reposted_by, r.reposted_by_display_name,
                   r.created_at AS reposted_at,
                   p.author_id, p.body, p.created_at
            FROM reposts r
            JOIN posts p ON p.id = r.post_id
            WHERE r.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reposts)
    }

    /// A user's bookmarks with their cached snapshots, newest first
    pub async fn user_bookmarks(&self, user_id: Uuid) -> AppResult<Vec<BookmarkEntry>> {
        let bookmarks = sqlx::query_as::<_, BookmarkEntry>(
            r#"
            SELECT post_id, cached_body, cached_media_urls, created_at
            FROM bookmarks
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookmarks)
    }
}

fn ledger_table(kind: ReactionKind) -> &'static str {
    match kind {
        ReactionKind::Heart => "likes",
        ReactionKind::Repost => "reposts",
        ReactionKind::Bookmark => "bookmarks",
    }
}

fn counter_column(kind: ReactionKind) -> &'static str {
    match kind {
        ReactionKind::Heart => "like_count",
        ReactionKind::Repost => "repost_count",
        ReactionKind::Bookmark => "bookmark_count",
    }
}
