pub mod memory;
pub mod postgres;
pub mod redis;
pub mod store;

pub use memory::{
    MemoryCatalogStore, MemoryInteractionLedger, MemoryPreferenceStore, MemoryStores,
};
pub use postgres::{
    create_pool, run_migrations, PgCatalogStore, PgInteractionLedger, PgPreferenceStore,
};
pub use self::redis::{create_redis_client, RedisStreamSink};
pub use store::{CatalogStore, InteractionLedger, PreferenceStore};
