use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;
use uuid::Uuid;

use super::pipeline::{RecommendationPipeline, RunSummary};

/// Identifier attached to every log line of one run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single-flight flag: at most one run holds it at a time
#[derive(Clone, Default)]
pub struct RunGuard {
    running: Arc<AtomicBool>,
}

/// Held while a run is active; releases the guard on drop
pub struct RunPermit {
    running: Arc<AtomicBool>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the guard, or `None` if a run is already in progress
    pub fn try_acquire(&self) -> Option<RunPermit> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunPermit {
                running: self.running.clone(),
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

/// What happened to one trigger
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    Completed(RunSummary),
    /// The run failed and was logged; the next trigger starts fresh
    Failed,
    /// Another run was still in progress
    Skipped,
}

/// Interval trigger for the recommendation pipeline
pub struct Scheduler {
    pipeline: Arc<RecommendationPipeline>,
    interval: Duration,
    guard: RunGuard,
}

impl Scheduler {
    pub fn new(pipeline: Arc<RecommendationPipeline>, interval: Duration) -> Self {
        Self {
            pipeline,
            interval,
            guard: RunGuard::new(),
        }
    }

    pub fn guard(&self) -> &RunGuard {
        &self.guard
    }

    /// Runs the pipeline once unless a run is already active
    ///
    /// Errors are logged here and never propagated.
    pub async fn trigger(&self) -> TriggerOutcome {
        let Some(_permit) = self.guard.try_acquire() else {
            tracing::warn!("Previous recommendation run still in progress, skipping trigger");
            return TriggerOutcome::Skipped;
        };

        let run_id = RunId::new();
        let span = tracing::info_span!("recommendation_run", run_id = %run_id);

        async {
            tracing::info!("Starting recommendation run");
            match self.pipeline.run_once(Utc::now()).await {
                Ok(summary) => TriggerOutcome::Completed(summary),
                Err(e) => {
                    tracing::error!(error = %e, stage = e.stage(), "Recommendation run failed");
                    TriggerOutcome::Failed
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Triggers a run every interval until `shutdown` resolves
    ///
    /// The first run starts immediately. Runs execute on this task, so shutdown
    /// is only observed between runs and an active run always finishes first.
    /// Ticks missed while a run was active are skipped rather than replayed.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Recommendation scheduler started"
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Recommendation scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.trigger().await;
                }
            }
        }
    }
}
