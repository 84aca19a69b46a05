use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Identifier of a user, as stored in `user_interactions.user_id`
pub type UserId = String;

/// Identifier of a video
///
/// Serialized untagged, so a numeric id stays a JSON number on the wire and a
/// textual id stays a string. Numeric ids order before textual ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VideoId {
    Int(i64),
    Text(String),
}

impl Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoId::Int(id) => write!(f, "{}", id),
            VideoId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for VideoId {
    fn from(id: i64) -> Self {
        VideoId::Int(id)
    }
}

impl From<&str> for VideoId {
    fn from(id: &str) -> Self {
        VideoId::Text(id.to_string())
    }
}

impl From<String> for VideoId {
    fn from(id: String) -> Self {
        VideoId::Text(id)
    }
}

impl PartialEq<str> for VideoId {
    fn eq(&self, other: &str) -> bool {
        matches!(self, VideoId::Text(id) if id == other)
    }
}

impl PartialEq<&str> for VideoId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Kind of interaction a user had with a video
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    /// Explicit like
    Like,
    /// Implicit watch signal, weighted by watch time
    Watch,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Like => "like",
            InteractionType::Watch => "watch",
        }
    }
}

impl Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(InteractionType::Like),
            "watch" => Ok(InteractionType::Watch),
            other => Err(AppError::InvalidData(format!(
                "unknown interaction type '{}'",
                other
            ))),
        }
    }
}

/// One historical interaction event
///
/// Events are not deduplicated: two likes of the same video by the same user
/// both contribute to that user's rating.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub user_id: UserId,
    pub video_id: VideoId,
    pub interaction_type: InteractionType,
    /// Seconds watched; zero for likes or when the source had no value
    pub watch_time_seconds: f64,
    /// When the event happened, if the source recorded it
    pub observed_at: Option<DateTime<Utc>>,
}

impl Interaction {
    pub fn like(user_id: impl Into<UserId>, video_id: impl Into<VideoId>) -> Self {
        Self {
            user_id: user_id.into(),
            video_id: video_id.into(),
            interaction_type: InteractionType::Like,
            watch_time_seconds: 0.0,
            observed_at: None,
        }
    }

    pub fn watch(
        user_id: impl Into<UserId>,
        video_id: impl Into<VideoId>,
        watch_time_seconds: f64,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            video_id: video_id.into(),
            interaction_type: InteractionType::Watch,
            watch_time_seconds,
            observed_at: None,
        }
    }

    /// Sets the event timestamp
    pub fn at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = Some(observed_at);
        self
    }
}
