use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::domain::models::ReactionKind;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// POST /api/posts/{id}/reactions/{kind}/toggle
///
/// Flips the caller's reaction of the given kind and returns the settled
/// state plus the post's counter, so an optimistic client can reconcile
/// without another read. A toggle that lands while the previous one for
/// the same key is still settling gets a conflict.
#[post("/api/posts/{id}/reactions/{kind}/toggle")]
pub async fn toggle_reaction(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, AppError> {
    let (post_id, kind) = path.into_inner();
    let kind = parse_kind(&kind)?;

    let outcome = state.reactions.toggle(kind, post_id, user.0).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// GET /api/posts/{id}/reactions/me
#[get("/api/posts/{id}/reactions/me")]
pub async fn my_reactions(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let summary = state.reactions.summary(post_id.into_inner(), user.0).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// GET /api/users/me/reposts
#[get("/api/users/me/reposts")]
pub async fn my_reposts(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let reposts = state.reactions.user_reposts(user.0).await?;
    Ok(HttpResponse::Ok().json(reposts))
}

/// GET /api/users/me/bookmarks
#[get("/api/users/me/bookmarks")]
pub async fn my_bookmarks(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let bookmarks = state.reactions.user_bookmarks(user.0).await?;
    Ok(HttpResponse::Ok().json(bookmarks))
}

fn parse_kind(raw: &str) -> Result<ReactionKind, AppError> {
    match raw {
        "heart" => Ok(ReactionKind::Heart),
        "repost" => Ok(ReactionKind::Repost),
        "bookmark" => Ok(ReactionKind::Bookmark),
        other => Err(AppError::BadRequest(format!("unknown reaction kind: {other}"))),
    }
}
