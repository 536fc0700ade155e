use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::Config,
    db::{
        create_pool, create_redis_client, run_migrations, PgCatalogStore, PgInteractionLedger,
        PgPreferenceStore, RedisStreamSink,
    },
    services::{EngineSettings, EngineStores, EventPublisher, InteractionEngine, PublisherHandle},
};

/// Fully wired engine with its Postgres pool and publisher loop
pub struct AppContext {
    pub engine: InteractionEngine,
    pub db_pool: PgPool,
    publisher_handle: PublisherHandle,
}

impl AppContext {
    /// Connects to Postgres and Redis, applies migrations and starts the publisher
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let settings = Arc::new(EngineSettings::from_config(config)?);

        let db_pool = create_pool(&config.database_url, config.database_max_connections).await?;
        run_migrations(&db_pool).await?;

        let redis_client = create_redis_client(&config.redis_url)?;
        let sink = RedisStreamSink::new(
            redis_client,
            config.event_stream_key.clone(),
            config.event_stream_max_len,
        );
        let (publisher, publisher_handle) =
            EventPublisher::new(Arc::new(sink), config.publish_queue_capacity);

        let stores = EngineStores {
            catalog: Arc::new(PgCatalogStore::new(db_pool.clone())),
            preferences: Arc::new(PgPreferenceStore::new(db_pool.clone())),
            ledger: Arc::new(PgInteractionLedger::new(db_pool.clone())),
        };
        let engine = InteractionEngine::new(stores, publisher, settings);

        tracing::info!(
            stream = %config.event_stream_key,
            smoothing = config.preference_smoothing,
            lock_shards = config.user_lock_shards,
            "Interaction engine ready"
        );

        Ok(Self {
            engine,
            db_pool,
            publisher_handle,
        })
    }

    /// Flushes pending notifications and closes the pool
    pub async fn shutdown(self) {
        self.publisher_handle.shutdown().await;
        self.db_pool.close().await;
        tracing::info!("Interaction engine stopped");
    }
}
