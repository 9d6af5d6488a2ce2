use serde_json::json;

use crate::config::SearchConfig;
use crate::domain::models::{Circle, Post, User};

/// Best-effort search index writer.
///
/// Indexing is a convenience, not a source of truth: failures are logged
/// and never propagated, and the client only exists when an endpoint is
/// configured.
#[derive(Clone)]
pub struct SearchIndexClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl SearchIndexClient {
    /// Returns None when no endpoint is configured; callers then skip
    /// indexing entirely.
    pub fn from_config(config: &SearchConfig) -> Option<Self> {
        let endpoint = config.endpoint.as_ref()?;
        Some(Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub async fn index_post(&self, post: &Post) {
        let record = json!({
            "objectID": post.id,
            "kind": "post",
            "author_id": post.author_id,
            "body": post.body,
            "audience": post.audience,
            "created_at": post.created_at,
        });
        self.upsert(record).await;
    }

    pub async fn index_user(&self, user: &User) {
        let record = json!({
            "objectID": user.id,
            "kind": "user",
            "username": user.username,
            "display_name": user.display_name,
        });
        self.upsert(record).await;
    }

    pub async fn index_circle(&self, circle: &Circle) {
        let record = json!({
            "objectID": circle.id,
            "kind": "circle",
            "name": circle.name,
            "tag": circle.tag,
        });
        self.upsert(record).await;
    }

    pub async fn remove(&self, object_id: uuid::Uuid) {
        let url = format!("{}/records/{}", self.endpoint, object_id);
        let mut req = self.http.delete(&url);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        if let Err(err) = req.send().await {
            tracing::warn!(%object_id, error = %err, "search index delete failed");
        }
    }

    async fn upsert(&self, record: serde_json::Value) {
        let url = format!("{}/records", self.endpoint);
        let mut req = self.http.post(&url).json(&record);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        match req.send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(status = %response.status(), "search index upsert rejected");
            }
            Err(err) => {
                tracing::warn!(error = %err, "search index upsert failed");
            }
            Ok(_) => {}
        }
    }
}
