use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::{Client, IntoConnectionInfo};
use std::fmt::Display;

use crate::db::RecommendationStore;
use crate::error::AppResult;
use crate::models::UserId;

/// Keys written to the recommendation store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Recommendations(UserId),
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::Recommendations(user_id) => write!(f, "recommendations:{}", user_id),
        }
    }
}

/// Creates a Redis client for the recommendation store
///
/// Accepts a URL or a prepared `ConnectionInfo`; `rediss://` URLs connect over TLS.
pub fn create_redis_client<T: IntoConnectionInfo>(connection: T) -> anyhow::Result<Client> {
    let client = Client::open(connection)?;
    Ok(client)
}

/// Recommendation store backed by Redis
///
/// Holds one reconnecting connection for the process lifetime. Values are
/// written with a plain `SET`: no TTL, the previous value is replaced.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis, failing fast if the server is unreachable
    pub async fn connect(client: Client) -> AppResult<Self> {
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to recommendation store");
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl RecommendationStore for RedisStore {
    async fn set(&self, key: &StoreKey, value: String) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key.to_string(), value).await?;
        Ok(())
    }

    async fn get(&self, key: &StoreKey) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key.to_string()).await?;
        Ok(value)
    }
}
