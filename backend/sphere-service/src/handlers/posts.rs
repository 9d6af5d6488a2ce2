use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::models::Audience;
use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub body: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    pub audience: Audience,
    pub circle_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Deserialize)]
pub struct AddCommentRequest {
    pub body: String,
    pub parent_comment_id: Option<Uuid>,
}

/// POST /api/posts
#[post("/api/posts")]
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, AppError> {
    if req.body.trim().is_empty() && req.media_urls.is_empty() {
        return Err(AppError::BadRequest("post must have text or media".into()));
    }
    if req.audience.in_circle_feed() && req.circle_id.is_none() {
        return Err(AppError::BadRequest(
            "circle-scoped posts need a circle_id".into(),
        ));
    }

    let post = state
        .posts
        .create_post(
            user.0,
            req.body.trim(),
            &req.media_urls,
            req.audience,
            req.circle_id,
        )
        .await?;

    // The post is durable; a snapshot rebuild failure is logged, not
    // surfaced.
    if let Err(err) = state
        .feed
        .refresh_for_post(&post.audience, post.circle_id)
        .await
    {
        tracing::warn!(post_id = %post.id, error = %err, "feed refresh after create failed");
    }

    if let Some(search) = &state.search {
        let search = search.clone();
        let indexed = post.clone();
        tokio::spawn(async move { search.index_post(&indexed).await });
    }

    Ok(HttpResponse::Created().json(post))
}

/// GET /api/posts/{id}
///
/// Reading a post records a view; the response carries the updated count.
#[get("/api/posts/{id}")]
pub async fn get_post(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let post_id = post_id.into_inner();
    let mut post = state
        .posts
        .get_post(post_id)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    post.view_count = state.posts.record_view(post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
#[delete("/api/posts/{id}")]
pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let post_id = post_id.into_inner();
    let post = state
        .posts
        .get_post(post_id)
        .await?
        .ok_or(AppError::NotFound("post"))?;
    if post.author_id != user.0 {
        return Err(AppError::Forbidden("only the author may delete a post".into()));
    }

    state.posts.delete_post(post_id).await?;
    if let Err(err) = state
        .feed
        .refresh_for_post(&post.audience, post.circle_id)
        .await
    {
        tracing::warn!(%post_id, error = %err, "feed refresh after delete failed");
    }

    if let Some(search) = &state.search {
        let search = search.clone();
        tokio::spawn(async move { search.remove(post_id).await });
    }

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/feed/global
#[get("/api/feed/global")]
pub async fn global_feed(
    state: web::Data<AppState>,
    page: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let posts = state.posts.list_global(page.limit(), page.offset()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/feed/circle/{id}
#[get("/api/feed/circle/{id}")]
pub async fn circle_feed(
    state: web::Data<AppState>,
    circle_id: web::Path<Uuid>,
    page: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let posts = state
        .posts
        .list_circle(circle_id.into_inner(), page.limit(), page.offset())
        .await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/users/{id}/posts
#[get("/api/users/{id}/posts")]
pub async fn author_posts(
    state: web::Data<AppState>,
    author_id: web::Path<Uuid>,
    page: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let posts = state
        .posts
        .list_by_author(author_id.into_inner(), page.limit(), page.offset())
        .await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}/comments
#[get("/api/posts/{id}/comments")]
pub async fn list_comments(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let comments = state.comments.list_comments(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// POST /api/posts/{id}/comments
#[post("/api/posts/{id}/comments")]
pub async fn add_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    post_id: web::Path<Uuid>,
    req: web::Json<AddCommentRequest>,
) -> Result<HttpResponse, AppError> {
    if req.body.trim().is_empty() {
        return Err(AppError::BadRequest("comment must not be empty".into()));
    }

    let post_id = post_id.into_inner();
    let comment = state
        .comments
        .add_comment(post_id, user.0, req.parent_comment_id, req.body.trim())
        .await?;

    // comment_count changed, refresh feeds that show this post; the
    // comment is durable, so refresh failures are logged only
    match state.posts.get_post(post_id).await {
        Ok(Some(post)) => {
            if let Err(err) = state
                .feed
                .refresh_for_post(&post.audience, post.circle_id)
                .await
            {
                tracing::warn!(%post_id, error = %err, "feed refresh after comment failed");
            }
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(%post_id, error = %err, "post lookup after comment failed");
        }
    }

    Ok(HttpResponse::Created().json(comment))
}

/// DELETE /api/comments/{id}
#[delete("/api/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthUser,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state
        .comments
        .delete_comment(comment_id.into_inner(), user.0)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "deleted": true })))
}
