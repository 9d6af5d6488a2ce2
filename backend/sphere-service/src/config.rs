/// Configuration management for sphere-service
///
/// Loads configuration from environment variables.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Payment gateway configuration
    pub payments: PaymentsConfig,
    /// Transactional email configuration
    pub email: EmailConfig,
    /// Search index configuration (optional, best-effort)
    pub search: SearchConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub http_port: u16,
}

/// Payment gateway (verify-by-reference) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    /// Gateway API base URL
    pub base_url: String,
    /// Bearer secret for the gateway API
    pub secret_key: String,
    /// Fixed settlement currency code
    pub currency: String,
}

/// Transactional email provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Provider API base URL
    pub base_url: String,
    /// Bearer token for the provider API
    pub api_key: String,
    /// Fixed sender address
    pub from: String,
}

/// Search index configuration; indexing is disabled when no endpoint is set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
        };

        let payments = PaymentsConfig {
            base_url: std::env::var("PAYMENT_GATEWAY_URL")
                .unwrap_or_else(|_| "https://api.paystack.co".to_string()),
            secret_key: std::env::var("PAYMENT_SECRET_KEY")
                .context("PAYMENT_SECRET_KEY environment variable not set")?,
            currency: std::env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "NGN".to_string()),
        };

        let email = EmailConfig {
            base_url: std::env::var("EMAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com".to_string()),
            api_key: std::env::var("EMAIL_API_KEY")
                .context("EMAIL_API_KEY environment variable not set")?,
            from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Sphere <no-reply@sphere.social>".to_string()),
        };

        let search = SearchConfig {
            endpoint: std::env::var("SEARCH_INDEX_URL").ok(),
            api_key: std::env::var("SEARCH_INDEX_API_KEY").ok(),
        };

        Ok(Config {
            app,
            payments,
            email,
            search,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        std::env::set_var("PAYMENT_SECRET_KEY", "sk_test");
        std::env::set_var("EMAIL_API_KEY", "re_test");
        std::env::remove_var("SEARCH_INDEX_URL");

        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.http_port, 8080);
        assert_eq!(config.payments.currency, "NGN");
        assert_eq!(config.payments.base_url, "https://api.paystack.co");
        assert!(config.search.endpoint.is_none());
    }
}
