use std::collections::HashMap;
use std::sync::Mutex;

use video_recommender::db::{InteractionSource, RecommendationStore, StoreKey};
use video_recommender::error::{AppError, AppResult};
use video_recommender::models::Interaction;

/// Interaction source serving a fixed history
pub struct FixedSource {
    pub interactions: Vec<Interaction>,
}

#[async_trait::async_trait]
impl InteractionSource for FixedSource {
    async fn fetch_interactions(&self) -> AppResult<Vec<Interaction>> {
        Ok(self.interactions.clone())
    }
}

/// Interaction source whose database is down
pub struct UnreachableSource;

#[async_trait::async_trait]
impl InteractionSource for UnreachableSource {
    async fn fetch_interactions(&self) -> AppResult<Vec<Interaction>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// In-memory key-value store, optionally failing after a number of writes
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    writes_before_failure: Option<usize>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn failing_after(writes: usize) -> Self {
        Self {
            writes_before_failure: Some(writes),
            ..Self::default()
        }
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait::async_trait]
impl RecommendationStore for MemoryStore {
    async fn set(&self, key: &StoreKey, value: String) -> AppResult<()> {
        let mut writes = self.writes.lock().unwrap();
        if self.writes_before_failure == Some(*writes) {
            return Err(AppError::Internal("store connection lost".to_string()));
        }
        *writes += 1;
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &StoreKey) -> AppResult<Option<String>> {
        Ok(self.values.lock().unwrap().get(&key.to_string()).cloned())
    }
}
