pub mod circles;
pub mod email;
pub mod feed;
pub mod follow;
pub mod monetization;
pub mod payments;
pub mod reactions;
pub mod search;

pub use circles::CircleService;
pub use email::EmailClient;
pub use feed::FeedService;
pub use follow::FollowService;
pub use monetization::MonetizationService;
pub use payments::PaymentsClient;
pub use reactions::ReactionService;
pub use search::SearchIndexClient;
