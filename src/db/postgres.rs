use chrono::NaiveDateTime;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use crate::db::InteractionSource;
use crate::error::{AppError, AppResult};
use crate::models::{Interaction, InteractionType, VideoId};

/// Creates a PostgreSQL connection pool
///
/// A run issues a single query, so the pool stays small.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url)
        .await?;

    Ok(pool)
}

const FETCH_INTERACTIONS: &str = r#"
    SELECT user_id,
           video_id::int8 AS video_id,
           interaction,
           COALESCE(watch_time, 0)::float8 AS watch_time,
           "timestamp" AS observed_at
    FROM user_interactions
    WHERE interaction IN ('like', 'watch')
    ORDER BY user_id, video_id
"#;

/// Raw row of `user_interactions`
#[derive(Debug, Clone, FromRow)]
pub struct InteractionRow {
    pub user_id: String,
    pub video_id: i64,
    pub interaction: String,
    pub watch_time: f64,
    /// `timestamp without time zone`, stored in UTC
    pub observed_at: Option<NaiveDateTime>,
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = AppError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        let interaction_type: InteractionType = row.interaction.parse()?;
        Ok(Interaction {
            user_id: row.user_id,
            video_id: VideoId::Int(row.video_id),
            interaction_type,
            watch_time_seconds: row.watch_time,
            observed_at: row.observed_at.map(|ts| ts.and_utc()),
        })
    }
}

/// Reads the full interaction history from Postgres
#[derive(Clone)]
pub struct PgInteractionSource {
    pool: PgPool,
}

impl PgInteractionSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl InteractionSource for PgInteractionSource {
    async fn fetch_interactions(&self) -> AppResult<Vec<Interaction>> {
        let rows: Vec<InteractionRow> = sqlx::query_as(FETCH_INTERACTIONS)
            .fetch_all(&self.pool)
            .await?;

        Ok(decode_rows(rows))
    }
}

/// Converts rows, skipping any with an interaction type the engine does not rate
fn decode_rows(rows: Vec<InteractionRow>) -> Vec<Interaction> {
    let total = rows.len();
    let interactions: Vec<Interaction> = rows
        .into_iter()
        .filter_map(|row| match Interaction::try_from(row) {
            Ok(interaction) => Some(interaction),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping interaction row");
                None
            }
        })
        .collect();

    if interactions.len() < total {
        tracing::warn!(
            skipped = total - interactions.len(),
            kept = interactions.len(),
            "Some interaction rows were not usable"
        );
    }

    interactions
}
