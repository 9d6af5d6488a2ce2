use serde::Serialize;
use serde_json::Value;

use crate::config::EmailConfig;
use crate::error::{AppError, AppResult};

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

/// Thin client for the transactional email provider. The sender address
/// is fixed by configuration; callers only choose recipient and content.
#[derive(Clone)]
pub struct EmailClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl EmailClient {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        }
    }

    /// Send one HTML email; returns the provider's response body.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<Value> {
        let url = format!("{}/emails", self.base_url);
        let body = SendRequest {
            from: &self.from,
            to: vec![to],
            subject,
            html,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("email provider unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %detail, "email provider rejected send");
            return Err(AppError::Upstream(format!(
                "email provider returned {status}"
            )));
        }

        let payload = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("malformed email provider response: {e}")))?;
        Ok(payload)
    }
}
