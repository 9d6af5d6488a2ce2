use uuid::Uuid;

use crate::domain::models::{Circle, CircleDeleteRequest, CircleMember};
use crate::error::{AppError, AppResult};
use crate::repository::CircleRepository;

/// Circle lifecycle and governance.
///
/// The decision rules live in free functions over already-loaded rows so
/// they can be checked without a database; the service methods load the
/// rows and apply them.
#[derive(Clone)]
pub struct CircleService {
    circles: CircleRepository,
}

/// Normalize a requested tag to the stored form: uppercase alphanumerics
/// only.
pub fn normalize_tag(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Whether `actor` may remove `target` from the circle. Admins remove
/// plain members; only the creator removes admins; the creator is never
/// removable.
pub fn removal_allowed(
    actor: &CircleMember,
    target: &CircleMember,
    creator_id: Uuid,
) -> Result<(), AppError> {
    if target.user_id == creator_id {
        return Err(AppError::Forbidden(
            "the circle creator cannot be removed".into(),
        ));
    }
    if !actor.is_admin {
        return Err(AppError::Forbidden("only admins may remove members".into()));
    }
    if target.is_admin && actor.user_id != creator_id {
        return Err(AppError::Forbidden(
            "only the creator may remove admins".into(),
        ));
    }
    Ok(())
}

/// Whether `actor` may open a deletion request: an admin who is not the
/// creator. The creator deletes directly instead of requesting.
pub fn delete_request_allowed(actor: &CircleMember, creator_id: Uuid) -> Result<(), AppError> {
    if !actor.is_admin {
        return Err(AppError::Forbidden(
            "only admins may request circle deletion".into(),
        ));
    }
    if actor.user_id == creator_id {
        return Err(AppError::BadRequest(
            "the creator deletes the circle directly".into(),
        ));
    }
    Ok(())
}

/// Whether `actor` may settle (approve or reject) a pending request:
/// the circle creator, and only while the request is still pending.
pub fn settle_request_allowed(
    request: &CircleDeleteRequest,
    creator_id: Uuid,
    actor_id: Uuid,
) -> Result<(), AppError> {
    if actor_id != creator_id {
        return Err(AppError::Forbidden(
            "only the creator may settle deletion requests".into(),
        ));
    }
    if request.status != "pending" {
        return Err(AppError::BadRequest(
            "the deletion request is no longer pending".into(),
        ));
    }
    Ok(())
}

impl CircleService {
    pub fn new(circles: CircleRepository) -> Self {
        Self { circles }
    }

    pub async fn create(&self, name: &str, tag: &str, creator_id: Uuid) -> AppResult<Circle> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("circle name must not be empty".into()));
        }
        let tag = normalize_tag(tag);
        if tag.is_empty() {
            return Err(AppError::BadRequest(
                "circle tag must contain letters or digits".into(),
            ));
        }

        let circle = self.circles.create_circle(name, &tag, creator_id).await?;
        tracing::info!(circle_id = %circle.id, %creator_id, "circle created");
        Ok(circle)
    }

    pub async fn get(&self, circle_id: Uuid) -> AppResult<Circle> {
        self.circles
            .get_circle(circle_id)
            .await?
            .ok_or(AppError::NotFound("circle"))
    }

    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Circle>> {
        self.circles.list_circles(limit, offset).await
    }

    pub async fn join(&self, circle_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        self.get(circle_id).await?;
        self.circles.join(circle_id, user_id).await
    }

    /// Leave a circle. The creator cannot leave their own circle.
    pub async fn leave(&self, circle_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let circle = self.get(circle_id).await?;
        if circle.creator_id == user_id {
            return Err(AppError::Forbidden(
                "the creator cannot leave their own circle".into(),
            ));
        }
        if !self.circles.remove_member(circle_id, user_id).await? {
            return Err(AppError::NotFound("membership"));
        }
        Ok(())
    }

    pub async fn members(&self, circle_id: Uuid) -> AppResult<Vec<CircleMember>> {
        self.get(circle_id).await?;
        self.circles.members(circle_id).await
    }

    pub async fn remove_member(
        &self,
        circle_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> AppResult<()> {
        let circle = self.get(circle_id).await?;
        let actor = self.member_of(circle_id, actor_id).await?;
        let target = self.member_of(circle_id, target_id).await?;

        removal_allowed(&actor, &target, circle.creator_id)?;

        self.circles.remove_member(circle_id, target_id).await?;
        tracing::info!(%circle_id, %actor_id, %target_id, "circle member removed");
        Ok(())
    }

    /// Grant admin; creator only.
    pub async fn promote_admin(
        &self,
        circle_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> AppResult<()> {
        let circle = self.get(circle_id).await?;
        if actor_id != circle.creator_id {
            return Err(AppError::Forbidden("only the creator may grant admin".into()));
        }
        self.member_of(circle_id, target_id).await?;
        self.circles.promote_admin(circle_id, target_id).await?;
        Ok(())
    }

    /// Revoke admin; creator only, and never from the creator themselves.
    pub async fn demote_admin(
        &self,
        circle_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> AppResult<()> {
        let circle = self.get(circle_id).await?;
        if actor_id != circle.creator_id {
            return Err(AppError::Forbidden(
                "only the creator may revoke admin".into(),
            ));
        }
        if target_id == circle.creator_id {
            return Err(AppError::Forbidden(
                "the creator's admin role cannot be revoked".into(),
            ));
        }
        self.member_of(circle_id, target_id).await?;
        self.circles.demote_admin(circle_id, target_id).await?;
        Ok(())
    }

    /// Direct deletion, reserved for the creator. Other admins go through
    /// the request workflow.
    pub async fn delete(&self, circle_id: Uuid, actor_id: Uuid) -> AppResult<()> {
        let circle = self.get(circle_id).await?;
        if actor_id != circle.creator_id {
            return Err(AppError::Forbidden(
                "only the creator may delete the circle directly".into(),
            ));
        }
        self.circles.delete_circle(circle_id).await?;
        tracing::info!(%circle_id, %actor_id, "circle deleted");
        Ok(())
    }

    /// Open a deletion request as a non-creator admin. At most one request
    /// per circle may be pending.
    pub async fn request_delete(
        &self,
        circle_id: Uuid,
        actor_id: Uuid,
    ) -> AppResult<CircleDeleteRequest> {
        let circle = self.get(circle_id).await?;
        let actor = self.member_of(circle_id, actor_id).await?;

        delete_request_allowed(&actor, circle.creator_id)?;

        let request = self.circles.create_delete_request(circle_id, actor_id).await?;
        tracing::info!(%circle_id, %actor_id, request_id = %request.id, "circle deletion requested");
        Ok(request)
    }

    /// Approve a pending request: the circle is deleted and the request
    /// row goes with it via cascade.
    pub async fn approve_delete(&self, request_id: Uuid, actor_id: Uuid) -> AppResult<()> {
        let (request, circle) = self.load_request(request_id).await?;
        settle_request_allowed(&request, circle.creator_id, actor_id)?;

        self.circles.delete_circle(circle.id).await?;
        tracing::info!(%request_id, circle_id = %circle.id, "circle deletion approved");
        Ok(())
    }

    /// Reject a pending request; the circle stays and the request is kept
    /// as rejected.
    pub async fn reject_delete(&self, request_id: Uuid, actor_id: Uuid) -> AppResult<()> {
        let (request, circle) = self.load_request(request_id).await?;
        settle_request_allowed(&request, circle.creator_id, actor_id)?;

        self.circles.reject_request(request_id).await?;
        tracing::info!(%request_id, circle_id = %circle.id, "circle deletion rejected");
        Ok(())
    }

    /// Pending requests across the caller's circles
    pub async fn pending_requests(&self, creator_id: Uuid) -> AppResult<Vec<CircleDeleteRequest>> {
        self.circles.pending_requests_for_creator(creator_id).await
    }

    async fn member_of(&self, circle_id: Uuid, user_id: Uuid) -> AppResult<CircleMember> {
        self.circles
            .member(circle_id, user_id)
            .await?
            .ok_or(AppError::NotFound("circle member"))
    }

    async fn load_request(&self, request_id: Uuid) -> AppResult<(CircleDeleteRequest, Circle)> {
        let request = self
            .circles
            .get_request(request_id)
            .await?
            .ok_or(AppError::NotFound("deletion request"))?;
        let circle = self.get(request.circle_id).await?;
        Ok((request, circle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn member(user_id: Uuid, is_admin: bool) -> CircleMember {
        CircleMember {
            circle_id: Uuid::new_v4(),
            user_id,
            is_admin,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn tag_normalization_strips_and_uppercases() {
        assert_eq!(normalize_tag("rustaceans!"), "RUSTACEANS");
        assert_eq!(normalize_tag("dev ops 24"), "DEVOPS24");
        assert_eq!(normalize_tag("---"), "");
    }

    #[test]
    fn admins_remove_plain_members_but_not_admins() {
        let creator_id = Uuid::new_v4();
        let admin = member(Uuid::new_v4(), true);
        let plain = member(Uuid::new_v4(), false);
        let other_admin = member(Uuid::new_v4(), true);

        assert!(removal_allowed(&admin, &plain, creator_id).is_ok());
        assert!(matches!(
            removal_allowed(&admin, &other_admin, creator_id),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn creator_removes_admins_but_is_never_removable() {
        let creator_id = Uuid::new_v4();
        let creator = member(creator_id, true);
        let admin = member(Uuid::new_v4(), true);

        assert!(removal_allowed(&creator, &admin, creator_id).is_ok());
        assert!(matches!(
            removal_allowed(&admin, &creator, creator_id),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn plain_members_cannot_remove_anyone() {
        let creator_id = Uuid::new_v4();
        let plain = member(Uuid::new_v4(), false);
        let other = member(Uuid::new_v4(), false);

        assert!(matches!(
            removal_allowed(&plain, &other, creator_id),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn deletion_requests_come_from_non_creator_admins_only() {
        let creator_id = Uuid::new_v4();
        let creator = member(creator_id, true);
        let admin = member(Uuid::new_v4(), true);
        let plain = member(Uuid::new_v4(), false);

        assert!(delete_request_allowed(&admin, creator_id).is_ok());
        assert!(matches!(
            delete_request_allowed(&creator, creator_id),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            delete_request_allowed(&plain, creator_id),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn only_the_creator_settles_pending_requests() {
        let creator_id = Uuid::new_v4();
        let request = CircleDeleteRequest {
            id: Uuid::new_v4(),
            circle_id: Uuid::new_v4(),
            requested_by: Uuid::new_v4(),
            status: "pending".to_string(),
            created_at: Utc::now(),
        };

        assert!(settle_request_allowed(&request, creator_id, creator_id).is_ok());
        assert!(matches!(
            settle_request_allowed(&request, creator_id, Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));

        let rejected = CircleDeleteRequest {
            status: "rejected".to_string(),
            ..request
        };
        assert!(matches!(
            settle_request_allowed(&rejected, creator_id, creator_id),
            Err(AppError::BadRequest(_))
        ));
    }
}
