use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::services::monetization::{BillingCycle, PLANS};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubscribeRequest {
    pub plan_id: String,
    /// Gateway transaction reference from the client-side charge
    pub reference: String,
}

#[derive(Serialize)]
pub struct PlanResponse {
    pub id: &'static str,
    pub tier: &'static str,
    pub cycle: &'static str,
    pub amount: i64,
}

/// GET /api/monetization/plans
#[get("/api/monetization/plans")]
pub async fn plans() -> HttpResponse {
    let catalog: Vec<PlanResponse> = PLANS
        .iter()
        .map(|p| PlanResponse {
            id: p.id,
            tier: p.tier.as_str(),
            cycle: match p.cycle {
                BillingCycle::Monthly => "monthly",
                BillingCycle::Yearly => "yearly",
            },
            amount: p.amount,
        })
        .collect();
    HttpResponse::Ok().json(catalog)
}

#[derive(Deserialize)]
pub struct VerifyPaymentRequest {
    pub reference: String,
    /// Expected charge in major currency units
    pub expected_amount: i64,
}

/// POST /api/payments/verify
///
/// Standalone verification of a gateway reference; subscription state is
/// untouched.
#[post("/api/payments/verify")]
pub async fn verify_payment(
    state: web::Data<AppState>,
    _user: AuthUser,
    req: web::Json<VerifyPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let tx = state
        .monetization
        .verify_payment(&req.reference, req.expected_amount)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "status": tx.status,
        "amount": tx.amount,
        "currency": tx.currency,
        "reference": tx.reference,
    })))
}

/// POST /api/monetization/subscribe
///
/// The client has already charged the gateway; this verifies the
/// reference against the chosen plan and activates the tier.
#[post("/api/monetization/subscribe")]
pub async fn subscribe(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<SubscribeRequest>,
) -> Result<HttpResponse, AppError> {
    let status = state
        .monetization
        .subscribe(user.0, &req.plan_id, &req.reference)
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

/// POST /api/monetization/unsubscribe
#[post("/api/monetization/unsubscribe")]
pub async fn unsubscribe(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    state.monetization.unsubscribe(user.0).await?;
    Ok(HttpResponse::Ok().json(json!({ "active": false })))
}

/// GET /api/monetization/status
#[get("/api/monetization/status")]
pub async fn subscription_status(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let status = state.monetization.status(user.0).await?;
    Ok(HttpResponse::Ok().json(status))
}

/// GET /api/monetization/dashboard
#[get("/api/monetization/dashboard")]
pub async fn dashboard(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let report = state.monetization.dashboard(user.0).await?;
    Ok(HttpResponse::Ok().json(report))
}
