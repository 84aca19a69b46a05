use std::sync::Arc;

use video_recommender::{
    config::Config,
    db::{create_pool, create_redis_client, PgInteractionSource, RedisStore},
    services::{Publisher, RecommendationPipeline, Scheduler, TriggerOutcome},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Connections live for the whole process and are handed to the pipeline
    let pool = create_pool(&config.database_url).await?;
    let redis_client = create_redis_client(config.redis_connection_info()?)?;
    let store = RedisStore::connect(redis_client).await?;

    let pipeline = Arc::new(RecommendationPipeline::new(
        Arc::new(PgInteractionSource::new(pool.clone())),
        Publisher::new(Arc::new(store)),
        config.engine_settings(),
    ));

    let scheduler = Scheduler::new(pipeline, config.schedule_interval());

    if config.run_once {
        let outcome = scheduler.trigger().await;
        pool.close().await;
        return match outcome {
            TriggerOutcome::Completed(summary) => {
                tracing::info!(published = summary.published, "Single run finished");
                Ok(())
            }
            _ => Err(anyhow::anyhow!("Recommendation run did not complete")),
        };
    }

    scheduler
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await;

    pool.close().await;
    tracing::info!("Shut down");
    Ok(())
}
