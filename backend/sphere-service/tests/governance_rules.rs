use chrono::Utc;
use sphere_service::domain::models::{CircleDeleteRequest, CircleMember};
use sphere_service::error::AppError;
use sphere_service::services::circles::{
    delete_request_allowed, normalize_tag, removal_allowed, settle_request_allowed,
};
use uuid::Uuid;

fn member(circle_id: Uuid, user_id: Uuid, is_admin: bool) -> CircleMember {
    CircleMember {
        circle_id,
        user_id,
        is_admin,
        joined_at: Utc::now(),
    }
}

fn pending_request(circle_id: Uuid, requested_by: Uuid) -> CircleDeleteRequest {
    CircleDeleteRequest {
        id: Uuid::new_v4(),
        circle_id,
        requested_by,
        status: "pending".to_string(),
        created_at: Utc::now(),
    }
}

#[test]
fn full_removal_matrix() {
    let circle_id = Uuid::new_v4();
    let creator_id = Uuid::new_v4();
    let creator = member(circle_id, creator_id, true);
    let admin = member(circle_id, Uuid::new_v4(), true);
    let plain = member(circle_id, Uuid::new_v4(), false);
    let other_plain = member(circle_id, Uuid::new_v4(), false);

    // creator: can remove anyone except themselves
    assert!(removal_allowed(&creator, &admin, creator_id).is_ok());
    assert!(removal_allowed(&creator, &plain, creator_id).is_ok());
    assert!(removal_allowed(&creator, &creator, creator_id).is_err());

    // admin: plain members only
    assert!(removal_allowed(&admin, &plain, creator_id).is_ok());
    assert!(removal_allowed(&admin, &creator, creator_id).is_err());

    // plain member: nobody
    assert!(removal_allowed(&plain, &other_plain, creator_id).is_err());
}

#[test]
fn deletion_request_lifecycle_permissions() {
    let circle_id = Uuid::new_v4();
    let creator_id = Uuid::new_v4();
    let admin_id = Uuid::new_v4();
    let admin = member(circle_id, admin_id, true);

    // a non-creator admin opens the request
    assert!(delete_request_allowed(&admin, creator_id).is_ok());

    // only the creator settles it
    let request = pending_request(circle_id, admin_id);
    assert!(settle_request_allowed(&request, creator_id, creator_id).is_ok());
    assert!(matches!(
        settle_request_allowed(&request, creator_id, admin_id),
        Err(AppError::Forbidden(_))
    ));

    // and not the requester either, even though they opened it
    assert!(settle_request_allowed(&request, creator_id, request.requested_by).is_err());
}

#[test]
fn settled_requests_cannot_be_settled_again() {
    let circle_id = Uuid::new_v4();
    let creator_id = Uuid::new_v4();

    let rejected = CircleDeleteRequest {
        status: "rejected".to_string(),
        ..pending_request(circle_id, Uuid::new_v4())
    };

    assert!(matches!(
        settle_request_allowed(&rejected, creator_id, creator_id),
        Err(AppError::BadRequest(_))
    ));
}

#[test]
fn tags_store_as_uppercase_alphanumerics() {
    assert_eq!(normalize_tag("night owls"), "NIGHTOWLS");
    assert_eq!(normalize_tag("Web3.0"), "WEB30");
    assert_eq!(normalize_tag("@#$%"), "");
}
