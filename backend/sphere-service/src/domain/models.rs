use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience scope tag controlling which feeds surface a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Global,
    Circle,
    Both,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Global => "global",
            Audience::Circle => "circle",
            Audience::Both => "both",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "global" => Some(Audience::Global),
            "circle" => Some(Audience::Circle),
            "both" => Some(Audience::Both),
            _ => None,
        }
    }

    /// Whether a post with this tag appears in the global feed
    pub fn in_global_feed(&self) -> bool {
        matches!(self, Audience::Global | Audience::Both)
    }

    /// Whether a post with this tag appears in its circle's feed
    pub fn in_circle_feed(&self) -> bool {
        matches!(self, Audience::Circle | Audience::Both)
    }
}

/// Reaction kinds maintained in per-(post, user) ledgers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Heart,
    Repost,
    Bookmark,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Heart => "heart",
            ReactionKind::Repost => "repost",
            ReactionKind::Bookmark => "bookmark",
        }
    }
}

/// Post entity with denormalized reaction counters
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub media_urls: Vec<String>,
    pub audience: String,
    pub circle_id: Option<Uuid>,
    pub like_count: i64,
    pub repost_count: i64,
    pub bookmark_count: i64,
    pub comment_count: i64,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Result of a reaction toggle, returned so optimistic callers can
/// reconcile without re-reading
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToggleOutcome {
    /// The resulting state: true when the ledger entry now exists
    pub active: bool,
    /// The post's counter for this kind after the toggle
    pub count: i64,
}

/// Per-user reaction summary for one post, loaded in a single round trip
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ReactionSummary {
    pub liked: bool,
    pub reposted: bool,
    pub bookmarked: bool,
}

/// Repost ledger entry joined with the reposted post
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RepostedPost {
    pub post_id: Uuid,
    pub reposted_by: Uuid,
    pub reposted_by_display_name: String,
    pub reposted_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Bookmark ledger entry with its cached post snapshot
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BookmarkEntry {
    pub post_id: Uuid,
    pub cached_body: String,
    pub cached_media_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Comment entity; replies carry a parent_comment_id
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Circle entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Circle {
    pub id: Uuid,
    pub name: String,
    pub tag: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Circle membership row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CircleMember {
    pub circle_id: Uuid,
    pub user_id: Uuid,
    pub is_admin: bool,
    pub joined_at: DateTime<Utc>,
}

/// Pending or rejected circle deletion request
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CircleDeleteRequest {
    pub id: Uuid,
    pub circle_id: Uuid,
    pub requested_by: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Monetization tier levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Creator,
    Pro,
    Enterprise,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Creator => "creator",
            Tier::Pro => "pro",
            Tier::Enterprise => "enterprise",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "creator" => Some(Tier::Creator),
            "pro" => Some(Tier::Pro),
            "enterprise" => Some(Tier::Enterprise),
            _ => None,
        }
    }

    /// Pro and enterprise tiers also earn from comments
    pub fn earns_from_comments(&self) -> bool {
        matches!(self, Tier::Pro | Tier::Enterprise)
    }
}

/// Monetization columns on the user row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MonetizationState {
    pub monetization_tier: Option<String>,
    pub monetization_active: bool,
    pub monetization_expires_at: Option<DateTime<Utc>>,
    pub monetization_last_reference: Option<String>,
    pub monetization_updated_at: Option<DateTime<Utc>>,
}

/// User profile with denormalized follow counters
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub photo_url: Option<String>,
    pub follower_count: i64,
    pub following_count: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audience_feed_membership() {
        assert!(Audience::Global.in_global_feed());
        assert!(Audience::Both.in_global_feed());
        assert!(!Audience::Circle.in_global_feed());

        assert!(Audience::Circle.in_circle_feed());
        assert!(Audience::Both.in_circle_feed());
        assert!(!Audience::Global.in_circle_feed());
    }

    #[test]
    fn audience_round_trips_through_str() {
        for audience in [Audience::Global, Audience::Circle, Audience::Both] {
            assert_eq!(Audience::parse(audience.as_str()), Some(audience));
        }
        assert_eq!(Audience::parse("friends"), None);
    }
}
