use serde::{Deserialize, Serialize};

use super::VideoId;

/// One ranked entry of a user's recommendation list
///
/// Serializes as `{"video_id": ..., "score": ...}`, the shape the feed reads back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub video_id: VideoId,
    pub score: f64,
}

impl Recommendation {
    pub fn new(video_id: impl Into<VideoId>, score: f64) -> Self {
        Self {
            video_id: video_id.into(),
            score,
        }
    }
}
