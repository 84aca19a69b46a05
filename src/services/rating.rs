use chrono::{DateTime, Utc};

use crate::models::{Interaction, InteractionType};

/// Score given to an explicit like
pub const LIKE_SCORE: f64 = 5.0;

/// Upper bound for a watch-derived score; likes always outrank watches
pub const WATCH_SCORE_CAP: f64 = 3.0;

/// Watch time (seconds) at which a watch reaches [`WATCH_SCORE_CAP`]
pub const WATCH_TIME_FOR_CAP: f64 = 30.0;

pub const DEFAULT_DECAY_RATE: f64 = 0.01;

/// Exponential down-weighting of older interactions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDecay {
    /// Decay per whole day of age
    pub rate: f64,
}

impl Default for TimeDecay {
    fn default() -> Self {
        Self {
            rate: DEFAULT_DECAY_RATE,
        }
    }
}

impl TimeDecay {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Multiplier in `(0, 1]` for an event observed at `observed_at`
    ///
    /// Age is truncated to whole days. Events dated in the future count as age 0.
    pub fn weight(&self, observed_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let age_days = (now - observed_at).num_days().max(0);
        (-self.rate * age_days as f64).exp()
    }
}

/// Converts raw interactions into scalar ratings in `[0, 5]`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingDeriver {
    decay: Option<TimeDecay>,
}

impl RatingDeriver {
    /// Deriver without time decay
    pub fn new() -> Self {
        Self { decay: None }
    }

    pub fn with_decay(decay: TimeDecay) -> Self {
        Self { decay: Some(decay) }
    }

    /// Undecayed score for an interaction
    pub fn base_score(interaction_type: InteractionType, watch_time_seconds: f64) -> f64 {
        match interaction_type {
            InteractionType::Like => LIKE_SCORE,
            InteractionType::Watch => {
                let watched = watch_time_seconds.max(0.0);
                (watched / WATCH_TIME_FOR_CAP * WATCH_SCORE_CAP).min(WATCH_SCORE_CAP)
            }
        }
    }

    /// Rating for one interaction
    ///
    /// With decay enabled, an interaction without a timestamp is not decayed.
    pub fn derive(
        &self,
        interaction_type: InteractionType,
        watch_time_seconds: f64,
        observed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> f64 {
        let base = Self::base_score(interaction_type, watch_time_seconds);
        match (self.decay, observed_at) {
            (Some(decay), Some(at)) => base * decay.weight(at, now),
            _ => base,
        }
    }

    pub fn rate(&self, interaction: &Interaction, now: DateTime<Utc>) -> f64 {
        self.derive(
            interaction.interaction_type,
            interaction.watch_time_seconds,
            interaction.observed_at,
            now,
        )
    }
}
