//! Feed subscription registry.
//!
//! Write paths publish rebuilt feed snapshots; each subscriber receives
//! the full materialized list for its scope, never an incremental diff.
//! Subscribers are tracked per scope and pruned precisely by id so a torn
//! down consumer cannot leak a channel.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    RwLock,
};
use uuid::Uuid;

use crate::domain::models::Post;

/// Which feed a subscriber is watching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedScope {
    /// Audience `global` or `both`
    Global,
    /// Posts of one circle with audience `circle` or `both`
    Circle(Uuid),
}

/// Unique identifier for a feed subscriber
///
/// Each subscription gets a unique id when it registers, allowing precise
/// cleanup when the consuming view is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber entry with id and delivery channel
struct Subscriber {
    id: SubscriberId,
    sender: UnboundedSender<Vec<Post>>,
}

/// Registry of active feed subscriptions, keyed by scope
#[derive(Default, Clone)]
pub struct FeedRegistry {
    inner: Arc<RwLock<HashMap<FeedScope, Vec<Subscriber>>>>,
}

impl FeedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber to a scope.
    ///
    /// Returns the subscription id (used for cleanup) and the channel on
    /// which snapshots arrive.
    pub async fn subscribe(&self, scope: FeedScope) -> (SubscriberId, UnboundedReceiver<Vec<Post>>) {
        let (tx, rx) = unbounded_channel();
        let id = SubscriberId::new();

        let mut guard = self.inner.write().await;
        guard
            .entry(scope)
            .or_default()
            .push(Subscriber { id, sender: tx });

        tracing::debug!(?scope, ?id, "feed subscriber added");
        (id, rx)
    }

    /// Remove one subscriber; further snapshots are not delivered to it.
    pub async fn unsubscribe(&self, scope: FeedScope, id: SubscriberId) {
        let mut guard = self.inner.write().await;
        if let Some(subs) = guard.get_mut(&scope) {
            subs.retain(|s| s.id != id);
            if subs.is_empty() {
                guard.remove(&scope);
            }
        }
        tracing::debug!(?scope, ?id, "feed subscriber removed");
    }

    /// Whether any subscriber is watching this scope; used to skip
    /// needless snapshot rebuilds.
    pub async fn has_subscribers(&self, scope: FeedScope) -> bool {
        self.inner
            .read()
            .await
            .get(&scope)
            .map(|subs| !subs.is_empty())
            .unwrap_or(false)
    }

    /// Deliver a snapshot to a single subscriber, used for the initial
    /// snapshot right after registration.
    pub async fn publish_to(&self, scope: FeedScope, id: SubscriberId, snapshot: Vec<Post>) {
        let guard = self.inner.read().await;
        if let Some(sub) = guard
            .get(&scope)
            .and_then(|subs| subs.iter().find(|s| s.id == id))
        {
            let _ = sub.sender.send(snapshot);
        }
    }

    /// Deliver a snapshot to every subscriber of a scope, pruning any
    /// whose receiving side is gone.
    pub async fn publish(&self, scope: FeedScope, snapshot: Vec<Post>) {
        let mut guard = self.inner.write().await;
        if let Some(subs) = guard.get_mut(&scope) {
            subs.retain(|s| s.sender.send(snapshot.clone()).is_ok());
            if subs.is_empty() {
                guard.remove(&scope);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(body: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            body: body.to_string(),
            media_urls: vec![],
            audience: "global".to_string(),
            circle_id: None,
            like_count: 0,
            repost_count: 0,
            bookmark_count: 0,
            comment_count: 0,
            view_count: 0,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn delivers_snapshots_to_matching_scope_only() {
        let registry = FeedRegistry::new();
        let circle = Uuid::new_v4();

        let (_gid, mut global_rx) = registry.subscribe(FeedScope::Global).await;
        let (_cid, mut circle_rx) = registry.subscribe(FeedScope::Circle(circle)).await;

        registry.publish(FeedScope::Global, vec![post("hello")]).await;

        let snapshot = global_rx.recv().await.expect("global snapshot");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].body, "hello");
        assert!(circle_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let registry = FeedRegistry::new();
        let (id, mut rx) = registry.subscribe(FeedScope::Global).await;

        registry.unsubscribe(FeedScope::Global, id).await;
        registry.publish(FeedScope::Global, vec![post("after")]).await;

        assert!(rx.recv().await.is_none());
        assert!(!registry.has_subscribers(FeedScope::Global).await);
    }

    #[tokio::test]
    async fn empty_snapshot_is_a_delivery_not_an_error() {
        let registry = FeedRegistry::new();
        let circle = Uuid::new_v4();
        let (_id, mut rx) = registry.subscribe(FeedScope::Circle(circle)).await;

        registry.publish(FeedScope::Circle(circle), vec![]).await;

        let snapshot = rx.recv().await.expect("empty snapshot delivered");
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn dropped_receiver_is_pruned_on_publish() {
        let registry = FeedRegistry::new();
        let (_id, rx) = registry.subscribe(FeedScope::Global).await;
        drop(rx);

        registry.publish(FeedScope::Global, vec![post("gone")]).await;
        assert!(!registry.has_subscribers(FeedScope::Global).await);
    }
}
