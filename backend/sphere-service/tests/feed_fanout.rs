use chrono::Utc;
use sphere_service::domain::models::Post;
use sphere_service::feed::{FeedRegistry, FeedScope};
use uuid::Uuid;

fn post_in(circle_id: Option<Uuid>, audience: &str, body: &str) -> Post {
    Post {
        id: Uuid::new_v4(),
        author_id: Uuid::new_v4(),
        body: body.to_string(),
        media_urls: vec![],
        audience: audience.to_string(),
        circle_id,
        like_count: 0,
        repost_count: 0,
        bookmark_count: 0,
        comment_count: 0,
        view_count: 0,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn every_subscriber_of_a_scope_receives_the_snapshot() {
    let registry = FeedRegistry::new();

    let (_a, mut rx_a) = registry.subscribe(FeedScope::Global).await;
    let (_b, mut rx_b) = registry.subscribe(FeedScope::Global).await;

    registry
        .publish(FeedScope::Global, vec![post_in(None, "global", "fanout")])
        .await;

    for rx in [&mut rx_a, &mut rx_b] {
        let snapshot = rx.recv().await.expect("snapshot delivered");
        assert_eq!(snapshot[0].body, "fanout");
    }
}

#[tokio::test]
async fn circle_scopes_are_isolated_from_each_other() {
    let registry = FeedRegistry::new();
    let circle_a = Uuid::new_v4();
    let circle_b = Uuid::new_v4();

    let (_a, mut rx_a) = registry.subscribe(FeedScope::Circle(circle_a)).await;
    let (_b, mut rx_b) = registry.subscribe(FeedScope::Circle(circle_b)).await;

    registry
        .publish(
            FeedScope::Circle(circle_a),
            vec![post_in(Some(circle_a), "circle", "only for a")],
        )
        .await;

    let snapshot = rx_a.recv().await.expect("circle a snapshot");
    assert_eq!(snapshot[0].circle_id, Some(circle_a));
    assert!(rx_b.try_recv().is_err());
}

#[tokio::test]
async fn a_snapshot_replaces_rather_than_appends() {
    // Consumers always get the full current list, so a shrinking result
    // set (a deleted post) propagates as a shorter snapshot.
    let registry = FeedRegistry::new();
    let (_id, mut rx) = registry.subscribe(FeedScope::Global).await;

    registry
        .publish(
            FeedScope::Global,
            vec![
                post_in(None, "global", "first"),
                post_in(None, "global", "second"),
            ],
        )
        .await;
    registry
        .publish(FeedScope::Global, vec![post_in(None, "global", "second")])
        .await;

    assert_eq!(rx.recv().await.expect("initial").len(), 2);
    assert_eq!(rx.recv().await.expect("after delete").len(), 1);
}

#[tokio::test]
async fn unsubscribing_one_leaves_the_rest_attached() {
    let registry = FeedRegistry::new();

    let (id_a, mut rx_a) = registry.subscribe(FeedScope::Global).await;
    let (_b, mut rx_b) = registry.subscribe(FeedScope::Global).await;

    registry.unsubscribe(FeedScope::Global, id_a).await;
    registry
        .publish(FeedScope::Global, vec![post_in(None, "global", "still here")])
        .await;

    assert!(rx_a.recv().await.is_none());
    assert_eq!(rx_b.recv().await.expect("remaining subscriber")[0].body, "still here");
}
