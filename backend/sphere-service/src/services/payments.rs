use serde::Deserialize;

use crate::config::PaymentsConfig;
use crate::error::{AppError, AppResult};

/// Transaction details reported by the gateway for one reference
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayTransaction {
    pub status: String,
    /// Amount in minor units (kobo)
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyEnvelope {
    data: GatewayTransaction,
}

/// Check a gateway transaction against what the caller was supposed to
/// pay. `expected_amount` is in major units; the gateway reports minor
/// units, so a successful match requires an exact hundredfold.
pub fn evaluate_transaction(
    tx: &GatewayTransaction,
    expected_amount: i64,
    expected_currency: &str,
) -> Result<(), AppError> {
    if tx.status != "success" {
        return Err(AppError::BadRequest(format!(
            "payment not successful: status {}",
            tx.status
        )));
    }
    if tx.amount != expected_amount * 100 {
        return Err(AppError::BadRequest("payment amount mismatch".into()));
    }
    if tx.currency != expected_currency {
        return Err(AppError::BadRequest("payment currency mismatch".into()));
    }
    Ok(())
}

/// Client for the payment gateway's verify-by-reference API
#[derive(Clone)]
pub struct PaymentsClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
    currency: String,
}

impl PaymentsClient {
    pub fn new(config: &PaymentsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
            currency: config.currency.clone(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Look up a transaction by its reference. Gateway failures surface as
    /// upstream errors; a transaction that exists but did not succeed is
    /// still returned, the caller evaluates it.
    pub async fn verify_reference(&self, reference: &str) -> AppResult<GatewayTransaction> {
        let url = format!("{}/transaction/verify/{}", self.base_url, reference);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("payment gateway unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "payment gateway returned {}",
                response.status()
            )));
        }

        let envelope: VerifyEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("malformed gateway response: {e}")))?;

        Ok(envelope.data)
    }

    /// Verify that `reference` settles `expected_amount` in the configured
    /// currency.
    pub async fn verify(&self, reference: &str, expected_amount: i64) -> AppResult<GatewayTransaction> {
        let tx = self.verify_reference(reference).await?;
        evaluate_transaction(&tx, expected_amount, &self.currency)?;
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(status: &str, amount: i64, currency: &str) -> GatewayTransaction {
        GatewayTransaction {
            status: status.to_string(),
            amount,
            currency: currency.to_string(),
            reference: Some("ref_1".to_string()),
        }
    }

    #[test]
    fn successful_exact_payment_passes() {
        assert!(evaluate_transaction(&tx("success", 250_000, "NGN"), 2500, "NGN").is_ok());
    }

    #[test]
    fn failed_status_is_rejected() {
        assert!(matches!(
            evaluate_transaction(&tx("failed", 250_000, "NGN"), 2500, "NGN"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn amount_must_match_to_the_minor_unit() {
        assert!(evaluate_transaction(&tx("success", 250_050, "NGN"), 2500, "NGN").is_err());
        assert!(evaluate_transaction(&tx("success", 249_900, "NGN"), 2500, "NGN").is_err());
    }

    #[test]
    fn currency_must_match() {
        assert!(evaluate_transaction(&tx("success", 250_000, "USD"), 2500, "NGN").is_err());
    }
}
