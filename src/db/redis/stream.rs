use redis::Client;

use crate::{
    error::{AppError, AppResult},
    models::InteractionNotification,
    services::publisher::EventSink,
};

/// Creates a Redis client for the event stream
///
/// The client itself does not connect; connections are opened per publish,
/// so a Redis outage never prevents startup.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Publishes interaction notifications to a Redis stream
#[derive(Clone)]
pub struct RedisStreamSink {
    redis_client: Client,
    stream_key: String,
    max_len: usize,
}

impl RedisStreamSink {
    pub fn new(redis_client: Client, stream_key: String, max_len: usize) -> Self {
        Self {
            redis_client,
            stream_key,
            max_len,
        }
    }

    /// Builds `XADD <key> MAXLEN ~ <n> * user_id <id> payload <json>`
    ///
    /// `user_id` alone is what the training consumer reads; `payload` carries the
    /// full notification for everyone else.
    fn xadd_command(&self, notification: &InteractionNotification) -> AppResult<redis::Cmd> {
        let payload = serde_json::to_string(notification).map_err(|e| {
            AppError::PublishUnavailable(format!("Notification serialization error: {}", e))
        })?;

        let mut cmd = redis::cmd("XADD");
        cmd.arg(&self.stream_key)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.max_len)
            .arg("*")
            .arg("user_id")
            .arg(notification.user_id.0)
            .arg("payload")
            .arg(payload);
        Ok(cmd)
    }
}

#[async_trait::async_trait]
impl EventSink for RedisStreamSink {
    async fn publish(&self, notification: &InteractionNotification) -> AppResult<()> {
        let cmd = self.xadd_command(notification)?;
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let entry_id: String = cmd.query_async(&mut conn).await?;
        tracing::debug!(
            stream = %self.stream_key,
            entry_id = %entry_id,
            user_id = %notification.user_id,
            "Notification appended to stream"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InteractionEvent, InteractionKind, ItemId, UserId};
    use redis::AsyncCommands;

    fn notification() -> InteractionNotification {
        InteractionNotification::from(&InteractionEvent::new(
            UserId(17),
            ItemId::new("track-1"),
            InteractionKind::Play,
        ))
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_xadd_command_layout() {
        let client = create_redis_client("redis://localhost:6379").unwrap();
        let sink = RedisStreamSink::new(client, "interactions".to_string(), 1000);

        let packed = sink.xadd_command(&notification()).unwrap().get_packed_command();

        assert!(contains(&packed, b"XADD"));
        assert!(contains(&packed, b"interactions"));
        assert!(contains(&packed, b"MAXLEN"));
        assert!(contains(&packed, b"user_id"));
        assert!(contains(&packed, b"\"kind\":\"play\""));
    }

    #[tokio::test]
    #[ignore = "requires a running Redis (REDIS_URL)"]
    async fn test_publish_appends_entry() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let key = format!("interactions-test-{}", uuid::Uuid::new_v4());
        let sink = RedisStreamSink::new(client.clone(), key.clone(), 100);

        sink.publish(&notification()).await.unwrap();

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let len: usize = redis::cmd("XLEN")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .unwrap();
        assert_eq!(len, 1);

        // Clean up
        let _: () = conn.del(&key).await.unwrap();
    }
}
