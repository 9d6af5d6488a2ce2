use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// POST /api/email/send
///
/// Forwards to the transactional email provider with the configured
/// sender; the provider's response body is returned as-is.
#[post("/api/email/send")]
pub async fn send_email(
    state: web::Data<AppState>,
    _user: AuthUser,
    req: web::Json<SendEmailRequest>,
) -> Result<HttpResponse, AppError> {
    if req.to.trim().is_empty() || !req.to.contains('@') {
        return Err(AppError::BadRequest("invalid recipient address".into()));
    }
    if req.subject.trim().is_empty() {
        return Err(AppError::BadRequest("subject must not be empty".into()));
    }

    let payload = state.email.send(&req.to, &req.subject, &req.html).await?;
    Ok(HttpResponse::Ok().json(payload))
}
