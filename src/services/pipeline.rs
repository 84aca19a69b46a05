use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::matrix::RatingMatrix;
use super::publisher::Publisher;
use super::rating::{RatingDeriver, TimeDecay};
use super::ranker::rank;
use super::similarity::SimilarityMatrix;
use crate::db::InteractionSource;
use crate::error::AppResult;
use crate::models::{Interaction, Recommendation};

/// Tunables of the recommendation engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Neighbours consulted per prediction
    pub k: usize,
    /// Maximum recommendations per user
    pub top_n: usize,
    /// Time decay of ratings, `None` to disable
    pub decay: Option<TimeDecay>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            k: 5,
            top_n: 5,
            decay: Some(TimeDecay::default()),
        }
    }
}

/// Everything derived from one run's interactions
#[derive(Debug, Clone)]
pub struct RecommendationModel {
    pub matrix: RatingMatrix,
    pub similarity: SimilarityMatrix,
}

/// Pure item-based collaborative filtering over a batch of interactions
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    settings: EngineSettings,
    deriver: RatingDeriver,
}

impl RecommendationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        let deriver = match settings.decay {
            Some(decay) => RatingDeriver::with_decay(decay),
            None => RatingDeriver::new(),
        };
        Self { settings, deriver }
    }

    /// Derives ratings, builds the rating matrix and its item similarities
    pub fn build_model(&self, interactions: &[Interaction], now: DateTime<Utc>) -> RecommendationModel {
        let ratings = interactions.iter().map(|interaction| {
            (
                interaction.user_id.clone(),
                interaction.video_id.clone(),
                self.deriver.rate(interaction, now),
            )
        });
        let matrix = RatingMatrix::build(ratings);
        let similarity = SimilarityMatrix::compute(&matrix);

        RecommendationModel { matrix, similarity }
    }

    /// Ranked recommendations for one user of the model
    pub fn recommend(&self, model: &RecommendationModel, user_id: &str) -> Vec<Recommendation> {
        rank(
            user_id,
            &model.matrix,
            &model.similarity,
            self.settings.k,
            self.settings.top_n,
        )
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub interactions: usize,
    pub users: usize,
    pub videos: usize,
    pub published: usize,
    pub elapsed: Duration,
}

/// One full fetch, compute and publish cycle
pub struct RecommendationPipeline {
    source: Arc<dyn InteractionSource>,
    publisher: Publisher,
    engine: RecommendationEngine,
}

impl RecommendationPipeline {
    pub fn new(
        source: Arc<dyn InteractionSource>,
        publisher: Publisher,
        settings: EngineSettings,
    ) -> Self {
        Self {
            source,
            publisher,
            engine: RecommendationEngine::new(settings),
        }
    }

    /// Runs the pipeline end to end
    ///
    /// A fetch failure aborts before anything is computed. Users are published
    /// one at a time in ascending id order; the first publish failure stops the
    /// run, leaving users already written in place.
    pub async fn run_once(&self, now: DateTime<Utc>) -> AppResult<RunSummary> {
        let start = Instant::now();

        let interactions = self.source.fetch_interactions().await?;
        tracing::info!(interactions = interactions.len(), "Fetched interactions");

        let model = self.engine.build_model(&interactions, now);
        let users = model.matrix.users().len();
        let videos = model.matrix.videos().len();

        tracing::info!(users, videos, "Built rating and similarity matrices");

        let mut published = 0;
        for user_id in model.matrix.users() {
            let recommendations = self.engine.recommend(&model, user_id);
            self.publisher.publish(user_id, &recommendations).await?;
            published += 1;
        }

        let elapsed = start.elapsed();
        tracing::info!(
            published,
            processing_time_ms = elapsed.as_millis(),
            "Generated and stored recommendations"
        );

        Ok(RunSummary {
            interactions: interactions.len(),
            users,
            videos,
            published,
            elapsed,
        })
    }
}
