use sqlx::PgPool;

use crate::config::Config;
use crate::feed::FeedRegistry;
use crate::repository::{
    CircleRepository, CommentRepository, FollowRepository, MonetizationRepository, PostRepository,
    ReactionRepository,
};
use crate::services::{
    CircleService, EmailClient, FeedService, FollowService, MonetizationService, PaymentsClient,
    ReactionService, SearchIndexClient,
};

/// Shared application state wired once at startup
#[derive(Clone)]
pub struct AppState {
    pub posts: PostRepository,
    pub comments: CommentRepository,
    pub feed: FeedService,
    pub reactions: ReactionService,
    pub follows: FollowService,
    pub circles: CircleService,
    pub monetization: MonetizationService,
    pub email: EmailClient,
    pub search: Option<SearchIndexClient>,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let posts = PostRepository::new(pool.clone());
        let feed = FeedService::new(posts.clone(), FeedRegistry::new());
        let reactions = ReactionService::new(
            ReactionRepository::new(pool.clone()),
            posts.clone(),
            feed.clone(),
        );
        let payments = PaymentsClient::new(&config.payments);

        Self {
            posts,
            comments: CommentRepository::new(pool.clone()),
            feed,
            reactions,
            follows: FollowService::new(FollowRepository::new(pool.clone())),
            circles: CircleService::new(CircleRepository::new(pool.clone())),
            monetization: MonetizationService::new(MonetizationRepository::new(pool), payments),
            email: EmailClient::new(&config.email),
            search: SearchIndexClient::from_config(&config.search),
        }
    }
}
