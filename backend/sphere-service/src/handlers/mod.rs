pub mod circles;
pub mod email;
pub mod feed_ws;
pub mod follows;
pub mod health;
pub mod monetization;
pub mod posts;
pub mod reactions;

use actix_web::web;

/// Register every route on the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(health::ready)
        .service(posts::create_post)
        .service(posts::get_post)
        .service(posts::delete_post)
        .service(posts::global_feed)
        .service(posts::circle_feed)
        .service(posts::author_posts)
        .service(posts::list_comments)
        .service(posts::add_comment)
        .service(posts::delete_comment)
        .service(reactions::toggle_reaction)
        .service(reactions::my_reactions)
        .service(reactions::my_reposts)
        .service(reactions::my_bookmarks)
        .service(follows::follow_user)
        .service(follows::unfollow_user)
        .service(follows::follow_state)
        .service(follows::followers)
        .service(follows::following)
        .service(circles::create_circle)
        .service(circles::list_circles)
        .service(circles::get_circle)
        .service(circles::join_circle)
        .service(circles::leave_circle)
        .service(circles::circle_members)
        .service(circles::remove_member)
        .service(circles::promote_admin)
        .service(circles::demote_admin)
        .service(circles::delete_circle)
        .service(circles::request_delete)
        .service(circles::approve_delete)
        .service(circles::reject_delete)
        .service(circles::pending_delete_requests)
        .service(monetization::subscribe)
        .service(monetization::unsubscribe)
        .service(monetization::subscription_status)
        .service(monetization::dashboard)
        .service(monetization::plans)
        .service(monetization::verify_payment)
        .service(email::send_email)
        .service(feed_ws::feed_ws);
}
