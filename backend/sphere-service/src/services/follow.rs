use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::repository::FollowRepository;

/// Follow graph operations with the self-follow guard applied up front
#[derive(Clone)]
pub struct FollowService {
    follows: FollowRepository,
}

impl FollowService {
    pub fn new(follows: FollowRepository) -> Self {
        Self { follows }
    }

    /// Follow another user. Rejected outright when the target is the
    /// caller; idempotent otherwise.
    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<bool> {
        if follower_id == followee_id {
            return Err(AppError::BadRequest("cannot follow yourself".into()));
        }

        let created = self.follows.follow(follower_id, followee_id).await?;
        if created {
            tracing::info!(%follower_id, %followee_id, "follow edge created");
        }
        Ok(created)
    }

    pub async fn unfollow(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<bool> {
        if follower_id == followee_id {
            return Err(AppError::BadRequest("cannot unfollow yourself".into()));
        }

        let removed = self.follows.unfollow(follower_id, followee_id).await?;
        if removed {
            tracing::info!(%follower_id, %followee_id, "follow edge removed");
        }
        Ok(removed)
    }

    pub async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> AppResult<bool> {
        self.follows.is_following(follower_id, followee_id).await
    }

    pub async fn followers(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Uuid>, i64)> {
        self.follows.followers(user_id, limit, offset).await
    }

    pub async fn following(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Uuid>, i64)> {
        self.follows.following(user_id, limit, offset).await
    }
}
