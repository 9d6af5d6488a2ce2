use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::domain::models::{Audience, Post};
use crate::error::AppResult;
use crate::feed::{FeedRegistry, FeedScope, SubscriberId};
use crate::repository::PostRepository;

/// Snapshots carry at most this many posts, newest first.
const SNAPSHOT_LIMIT: i64 = 100;

/// Coordinates feed reads, live subscriptions and the snapshot rebuilds
/// that write paths trigger.
#[derive(Clone)]
pub struct FeedService {
    posts: PostRepository,
    registry: FeedRegistry,
}

impl FeedService {
    pub fn new(posts: PostRepository, registry: FeedRegistry) -> Self {
        Self { posts, registry }
    }

    /// One-shot paginated read of a feed scope
    pub async fn load(&self, scope: FeedScope, limit: i64, offset: i64) -> AppResult<Vec<Post>> {
        match scope {
            FeedScope::Global => self.posts.list_global(limit, offset).await,
            FeedScope::Circle(circle_id) => self.posts.list_circle(circle_id, limit, offset).await,
        }
    }

    /// Register a live subscription. The current snapshot is delivered
    /// immediately so the consumer never starts from an empty view.
    pub async fn subscribe(
        &self,
        scope: FeedScope,
    ) -> AppResult<(SubscriberId, UnboundedReceiver<Vec<Post>>)> {
        let snapshot = self.load(scope, SNAPSHOT_LIMIT, 0).await?;
        let (id, rx) = self.registry.subscribe(scope).await;
        self.registry.publish_to(scope, id, snapshot).await;
        Ok((id, rx))
    }

    pub async fn unsubscribe(&self, scope: FeedScope, id: SubscriberId) {
        self.registry.unsubscribe(scope, id).await;
    }

    /// Rebuild and fan out the scopes a post belongs to. Called after any
    /// write that changes feed contents or counters. Scopes without
    /// subscribers are skipped.
    pub async fn refresh_for_post(&self, audience: &str, circle_id: Option<Uuid>) -> AppResult<()> {
        let Some(audience) = Audience::parse(audience) else {
            return Ok(());
        };

        if audience.in_global_feed() {
            self.refresh_scope(FeedScope::Global).await?;
        }
        if audience.in_circle_feed() {
            if let Some(circle_id) = circle_id {
                self.refresh_scope(FeedScope::Circle(circle_id)).await?;
            }
        }
        Ok(())
    }

    async fn refresh_scope(&self, scope: FeedScope) -> AppResult<()> {
        if !self.registry.has_subscribers(scope).await {
            return Ok(());
        }
        let snapshot = self.load(scope, SNAPSHOT_LIMIT, 0).await?;
        self.registry.publish(scope, snapshot).await;
        Ok(())
    }
}
