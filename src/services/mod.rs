pub mod matrix;
pub mod pipeline;
pub mod predictor;
pub mod publisher;
pub mod ranker;
pub mod rating;
pub mod scheduler;
pub mod similarity;

pub use matrix::RatingMatrix;
pub use pipeline::{
    EngineSettings, RecommendationEngine, RecommendationModel, RecommendationPipeline, RunSummary,
};
pub use predictor::predict;
pub use publisher::Publisher;
pub use ranker::rank;
pub use rating::{RatingDeriver, TimeDecay};
pub use scheduler::{RunGuard, RunId, Scheduler, TriggerOutcome};
pub use similarity::SimilarityMatrix;
