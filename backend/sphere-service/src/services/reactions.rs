use std::sync::Arc;

use dashmap::DashSet;
use uuid::Uuid;

use crate::domain::models::{
    BookmarkEntry, ReactionKind, ReactionSummary, RepostedPost, ToggleOutcome,
};
use crate::error::{AppError, AppResult};
use crate::repository::{PostRepository, ReactionRepository};
use crate::services::FeedService;

type InFlightKey = (ReactionKind, Uuid, Uuid);

/// Tracks toggles that have been dispatched but not yet settled.
///
/// At most one toggle per (kind, post, user) may be in flight; the key is
/// held for the lifetime of the returned guard and released when it
/// drops, on success and on error alike.
#[derive(Clone, Default)]
pub struct InFlightSet {
    inner: Arc<DashSet<InFlightKey>>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a key. Returns None when the same key is already in flight.
    pub fn acquire(&self, key: InFlightKey) -> Option<InFlightGuard> {
        if self.inner.insert(key) {
            Some(InFlightGuard {
                set: Arc::clone(&self.inner),
                key,
            })
        } else {
            None
        }
    }
}

/// Releases the in-flight key when the toggle settles
pub struct InFlightGuard {
    set: Arc<DashSet<InFlightKey>>,
    key: InFlightKey,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.remove(&self.key);
    }
}

/// Orchestrates reaction toggles: serializes per (kind, post, user),
/// applies the ledger/counter transaction and refreshes affected feeds.
#[derive(Clone)]
pub struct ReactionService {
    reactions: ReactionRepository,
    posts: PostRepository,
    feed: FeedService,
    in_flight: InFlightSet,
}

impl ReactionService {
    pub fn new(reactions: ReactionRepository, posts: PostRepository, feed: FeedService) -> Self {
        Self {
            reactions,
            posts,
            feed,
            in_flight: InFlightSet::new(),
        }
    }

    /// Toggle a reaction for the caller.
    ///
    /// A second toggle of the same (kind, post, user) while one is still
    /// settling is rejected with a conflict rather than queued, matching
    /// the one-in-flight-per-key discipline the optimistic client relies
    /// on.
    pub async fn toggle(
        &self,
        kind: ReactionKind,
        post_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<ToggleOutcome> {
        let _guard = self
            .in_flight
            .acquire((kind, post_id, user_id))
            .ok_or(AppError::InFlight(kind.as_str()))?;

        let outcome = self.reactions.toggle(kind, post_id, user_id).await?;

        tracing::info!(
            kind = kind.as_str(),
            %post_id,
            %user_id,
            active = outcome.active,
            count = outcome.count,
            "reaction toggled"
        );

        // Counter changes surface in feed snapshots, so subscribed scopes
        // get a rebuild. The toggle itself has already committed; any
        // post-commit failure here is logged, not surfaced.
        match self.posts.get_post(post_id).await {
            Ok(Some(post)) => {
                if let Err(err) = self.feed.refresh_for_post(&post.audience, post.circle_id).await {
                    tracing::warn!(%post_id, error = %err, "feed refresh after toggle failed");
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%post_id, error = %err, "post lookup after toggle failed");
            }
        }

        Ok(outcome)
    }

    /// Per-user reaction state for one post
    pub async fn summary(&self, post_id: Uuid, user_id: Uuid) -> AppResult<ReactionSummary> {
        self.reactions.summary(post_id, user_id).await
    }

    pub async fn user_reposts(&self, user_id: Uuid) -> AppResult<Vec<RepostedPost>> {
        self.reactions.user_reposts(user_id).await
    }

    pub async fn user_bookmarks(&self, user_id: Uuid) -> AppResult<Vec<BookmarkEntry>> {
        self.reactions.user_bookmarks(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(kind: ReactionKind) -> InFlightKey {
        (kind, Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn duplicate_acquire_is_rejected_until_release() {
        let set = InFlightSet::new();
        let k = key(ReactionKind::Heart);

        let guard = set.acquire(k).expect("first acquire");
        assert!(set.acquire(k).is_none());

        drop(guard);
        assert!(set.acquire(k).is_some());
    }

    #[test]
    fn distinct_keys_do_not_contend() {
        let set = InFlightSet::new();
        let post_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        // same post and user, different kinds
        let _heart = set
            .acquire((ReactionKind::Heart, post_id, user_id))
            .expect("heart");
        let _bookmark = set
            .acquire((ReactionKind::Bookmark, post_id, user_id))
            .expect("bookmark");

        // same kind, different user
        let _other = set
            .acquire((ReactionKind::Heart, post_id, Uuid::new_v4()))
            .expect("other user");
    }

    #[test]
    fn failed_settle_still_releases_the_key() {
        let set = InFlightSet::new();
        let k = key(ReactionKind::Repost);

        // an error path drops the guard the same way success does
        let result: Result<(), ()> = (|| {
            let _guard = set.acquire(k).expect("acquire");
            Err(())
        })();
        assert!(result.is_err());

        assert!(set.acquire(k).is_some());
    }

    #[tokio::test]
    async fn second_of_two_concurrent_identical_toggles_is_blocked() {
        let set = InFlightSet::new();
        let k = key(ReactionKind::Heart);

        let first = set.acquire(k).expect("first toggle holds the key");

        // a duplicate landing while the first is still settling
        let contender = {
            let set = set.clone();
            tokio::spawn(async move { set.acquire(k).is_none() })
        };
        assert!(contender.await.expect("task completes"));

        drop(first);
        assert!(set.acquire(k).is_some());
    }
}
