use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCircleRequest {
    pub name: String,
    pub tag: String,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/circles
#[post("/api/circles")]
pub async fn create_circle(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreateCircleRequest>,
) -> Result<HttpResponse, AppError> {
    let circle = state.circles.create(&req.name, &req.tag, user.0).await?;

    if let Some(search) = &state.search {
        let search = search.clone();
        let indexed = circle.clone();
        tokio::spawn(async move { search.index_circle(&indexed).await });
    }

    Ok(HttpResponse::Created().json(circle))
}

/// GET /api/circles
#[get("/api/circles")]
pub async fn list_circles(
    state: web::Data<AppState>,
    page: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = page.limit.unwrap_or(50).clamp(1, 200);
    let offset = page.offset.unwrap_or(0).max(0);
    let circles = state.circles.list(limit, offset).await?;
    Ok(HttpResponse::Ok().json(circles))
}

/// GET /api/circles/{id}
#[get("/api/circles/{id}")]
pub async fn get_circle(
    state: web::Data<AppState>,
    circle_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let circle = state.circles.get(circle_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(circle))
}

/// POST /api/circles/{id}/join
#[post("/api/circles/{id}/join")]
pub async fn join_circle(
    state: web::Data<AppState>,
    user: AuthUser,
    circle_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let joined = state.circles.join(circle_id.into_inner(), user.0).await?;
    Ok(HttpResponse::Ok().json(json!({ "member": true, "joined": joined })))
}

/// POST /api/circles/{id}/leave
#[post("/api/circles/{id}/leave")]
pub async fn leave_circle(
    state: web::Data<AppState>,
    user: AuthUser,
    circle_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.circles.leave(circle_id.into_inner(), user.0).await?;
    Ok(HttpResponse::Ok().json(json!({ "member": false })))
}

/// GET /api/circles/{id}/members
#[get("/api/circles/{id}/members")]
pub async fn circle_members(
    state: web::Data<AppState>,
    circle_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let members = state.circles.members(circle_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(members))
}

/// DELETE /api/circles/{id}/members/{user_id}
#[delete("/api/circles/{id}/members/{user_id}")]
pub async fn remove_member(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (circle_id, target_id) = path.into_inner();
    state.circles.remove_member(circle_id, user.0, target_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/circles/{id}/admins/{user_id}
#[post("/api/circles/{id}/admins/{user_id}")]
pub async fn promote_admin(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (circle_id, target_id) = path.into_inner();
    state.circles.promote_admin(circle_id, user.0, target_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "admin": true })))
}

/// DELETE /api/circles/{id}/admins/{user_id}
#[delete("/api/circles/{id}/admins/{user_id}")]
pub async fn demote_admin(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (circle_id, target_id) = path.into_inner();
    state.circles.demote_admin(circle_id, user.0, target_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "admin": false })))
}

/// DELETE /api/circles/{id}
///
/// Direct deletion, creator only. Non-creator admins use the request
/// workflow instead.
#[delete("/api/circles/{id}")]
pub async fn delete_circle(
    state: web::Data<AppState>,
    user: AuthUser,
    circle_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.circles.delete(circle_id.into_inner(), user.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/circles/{id}/delete-requests
#[post("/api/circles/{id}/delete-requests")]
pub async fn request_delete(
    state: web::Data<AppState>,
    user: AuthUser,
    circle_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let request = state
        .circles
        .request_delete(circle_id.into_inner(), user.0)
        .await?;
    Ok(HttpResponse::Created().json(request))
}

/// POST /api/delete-requests/{id}/approve
#[post("/api/delete-requests/{id}/approve")]
pub async fn approve_delete(
    state: web::Data<AppState>,
    user: AuthUser,
    request_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state
        .circles
        .approve_delete(request_id.into_inner(), user.0)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "approved": true })))
}

/// POST /api/delete-requests/{id}/reject
#[post("/api/delete-requests/{id}/reject")]
pub async fn reject_delete(
    state: web::Data<AppState>,
    user: AuthUser,
    request_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state
        .circles
        .reject_delete(request_id.into_inner(), user.0)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "rejected": true })))
}

/// GET /api/delete-requests/pending
#[get("/api/delete-requests/pending")]
pub async fn pending_delete_requests(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let requests = state.circles.pending_requests(user.0).await?;
    Ok(HttpResponse::Ok().json(requests))
}
