use std::sync::Arc;

use crate::db::{RecommendationStore, StoreKey};
use crate::error::AppResult;
use crate::models::Recommendation;

/// Writes per-user recommendation lists to the store
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn RecommendationStore>,
}

impl Publisher {
    pub fn new(store: Arc<dyn RecommendationStore>) -> Self {
        Self { store }
    }

    /// Stores `recommendations` under `recommendations:<user_id>`
    ///
    /// The list is written as a JSON array of `{"video_id", "score"}` objects
    /// and unconditionally replaces whatever was there before.
    pub async fn publish(&self, user_id: &str, recommendations: &[Recommendation]) -> AppResult<()> {
        let key = StoreKey::Recommendations(user_id.to_string());
        let json = serde_json::to_string(recommendations)?;

        self.store.set(&key, json).await?;

        tracing::debug!(
            user_id = %user_id,
            key = %key,
            count = recommendations.len(),
            "Stored recommendations"
        );
        Ok(())
    }

    /// Reads back a user's published list; a missing key reads as empty
    pub async fn fetch(&self, user_id: &str) -> AppResult<Vec<Recommendation>> {
        let key = StoreKey::Recommendations(user_id.to_string());
        match self.store.get(&key).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockRecommendationStore;
    use crate::error::AppError;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_publish_key_and_payload() {
        let mut store = MockRecommendationStore::new();
        store
            .expect_set()
            .with(
                eq(StoreKey::Recommendations("u42".to_string())),
                eq(r#"[{"video_id":"v1","score":4.2},{"video_id":"v2","score":3.1}]"#.to_string()),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let publisher = Publisher::new(Arc::new(store));
        let recs = vec![Recommendation::new("v1", 4.2), Recommendation::new("v2", 3.1)];
        tokio_test::assert_ok!(publisher.publish("u42", &recs).await);
    }

    #[tokio::test]
    async fn test_publish_numeric_ids_as_numbers() {
        let mut store = MockRecommendationStore::new();
        store
            .expect_set()
            .with(
                eq(StoreKey::Recommendations("u1".to_string())),
                eq(r#"[{"video_id":17,"score":4.5}]"#.to_string()),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let publisher = Publisher::new(Arc::new(store));
        tokio_test::assert_ok!(publisher.publish("u1", &[Recommendation::new(17i64, 4.5)]).await);
    }

    #[tokio::test]
    async fn test_publish_empty_list() {
        let mut store = MockRecommendationStore::new();
        store
            .expect_set()
            .with(
                eq(StoreKey::Recommendations("lonely".to_string())),
                eq("[]".to_string()),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let publisher = Publisher::new(Arc::new(store));
        tokio_test::assert_ok!(publisher.publish("lonely", &[]).await);
    }

    #[tokio::test]
    async fn test_publish_propagates_store_error() {
        let mut store = MockRecommendationStore::new();
        store
            .expect_set()
            .returning(|_, _| Err(AppError::Internal("store unavailable".to_string())));

        let publisher = Publisher::new(Arc::new(store));
        let result = publisher.publish("u1", &[Recommendation::new("v1", 1.0)]).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_fetch_missing_key_is_empty() {
        let mut store = MockRecommendationStore::new();
        store.expect_get().returning(|_| Ok(None));

        let publisher = Publisher::new(Arc::new(store));
        assert!(publisher.fetch("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_decodes_stored_list() {
        let mut store = MockRecommendationStore::new();
        store
            .expect_get()
            .with(eq(StoreKey::Recommendations("u7".to_string())))
            .returning(|_| Ok(Some(r#"[{"video_id":12,"score":2.5},{"video_id":"x9","score":1.0}]"#.to_string())));

        let publisher = Publisher::new(Arc::new(store));
        let recs = publisher.fetch("u7").await.unwrap();
        assert_eq!(
            recs,
            vec![Recommendation::new(12i64, 2.5), Recommendation::new("x9", 1.0)]
        );
    }

    #[tokio::test]
    async fn test_fetch_rejects_corrupt_value() {
        let mut store = MockRecommendationStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some("not json".to_string())));

        let publisher = Publisher::new(Arc::new(store));
        let result = publisher.fetch("u7").await;
        assert!(matches!(result, Err(AppError::Serialization(_))));
    }
}
