pub mod stream;

pub use stream::create_redis_client;
pub use stream::RedisStreamSink;
