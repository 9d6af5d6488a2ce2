pub mod circles;
pub mod comments;
pub mod follows;
pub mod monetization;
pub mod posts;
pub mod reactions;

pub use circles::CircleRepository;
pub use comments::CommentRepository;
pub use follows::FollowRepository;
pub use monetization::{EarningsInputs, MonetizationRepository};
pub use posts::PostRepository;
pub use reactions::ReactionRepository;
