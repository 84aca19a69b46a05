pub mod postgres;
pub mod redis;

pub use postgres::create_pool;
pub use postgres::PgInteractionSource;
pub use self::redis::create_redis_client;
pub use self::redis::RedisStore;
pub use self::redis::StoreKey;

use crate::error::AppResult;
use crate::models::Interaction;

/// Source of raw interaction events
///
/// Every run reads the full history; nothing is carried between runs.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InteractionSource: Send + Sync {
    /// Fetch every `like`/`watch` interaction
    async fn fetch_interactions(&self) -> AppResult<Vec<Interaction>>;
}

/// Key-value sink the recommendation lists are published to
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Replace the value stored at `key`
    async fn set(&self, key: &StoreKey, value: String) -> AppResult<()>;

    /// Read the value stored at `key`
    async fn get(&self, key: &StoreKey) -> AppResult<Option<String>>;
}
