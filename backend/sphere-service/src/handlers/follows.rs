use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize)]
pub struct FollowListResponse {
    pub user_ids: Vec<Uuid>,
    pub total: i64,
}

/// POST /api/users/{id}/follow
#[post("/api/users/{id}/follow")]
pub async fn follow_user(
    state: web::Data<AppState>,
    user: AuthUser,
    target: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let created = state.follows.follow(user.0, target.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "following": true, "created": created })))
}

/// DELETE /api/users/{id}/follow
#[delete("/api/users/{id}/follow")]
pub async fn unfollow_user(
    state: web::Data<AppState>,
    user: AuthUser,
    target: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let removed = state.follows.unfollow(user.0, target.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "following": false, "removed": removed })))
}

/// GET /api/users/{id}/follow-state
#[get("/api/users/{id}/follow-state")]
pub async fn follow_state(
    state: web::Data<AppState>,
    user: AuthUser,
    target: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let is_following = state
        .follows
        .is_following(user.0, target.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "following": is_following })))
}

/// GET /api/users/{id}/followers
#[get("/api/users/{id}/followers")]
pub async fn followers(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    page: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = page.limit.unwrap_or(50).clamp(1, 200);
    let offset = page.offset.unwrap_or(0).max(0);
    let (user_ids, total) = state
        .follows
        .followers(user_id.into_inner(), limit, offset)
        .await?;
    Ok(HttpResponse::Ok().json(FollowListResponse { user_ids, total }))
}

/// GET /api/users/{id}/following
#[get("/api/users/{id}/following")]
pub async fn following(
    state: web::Data<AppState>,
    user_id: web::Path<Uuid>,
    page: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = page.limit.unwrap_or(50).clamp(1, 200);
    let offset = page.offset.unwrap_or(0).max(0);
    let (user_ids, total) = state
        .follows
        .following(user_id.into_inner(), limit, offset)
        .await?;
    Ok(HttpResponse::Ok().json(FollowListResponse { user_ids, total }))
}
