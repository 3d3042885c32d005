use std::sync::Arc;

use ratings_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, MemoryRatingStore, PgRatingStore, RatingStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ratings_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn RatingStore> = match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url, config.db_max_connections).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            Arc::new(PgRatingStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, ratings are kept in memory");
            Arc::new(MemoryRatingStore::new())
        }
    };

    tracing::info!(
        store = store.name(),
        scale_min = config.rating_scale_min,
        scale_max = config.rating_scale_max,
        max_candidates = config.max_candidates,
        "Initializing application state"
    );

    let state = AppState::from_config(store, &config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
