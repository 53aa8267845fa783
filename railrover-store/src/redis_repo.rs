use async_trait::async_trait;
use redis::{AsyncCommands, RedisResult};

use railrover_core::messaging::{PublishError, TaskQueue};

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Jobs are pushed to the head and popped from the tail, so the queue
    /// drains in FIFO order.
    pub async fn push_job(&self, queue: &str, payload: &str) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("queue:{}", queue);
        conn.lpush::<_, _, ()>(key, payload).await?;
        Ok(())
    }

    /// Blocking pop with a timeout; returns None when the queue stayed empty.
    pub async fn pop_job(&self, queue: &str, timeout_seconds: f64) -> RedisResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("queue:{}", queue);
        let popped: Option<(String, String)> = conn.brpop(key, timeout_seconds).await?;
        Ok(popped.map(|(_, payload)| payload))
    }

    pub async fn check_rate_limit(&self, key: &str, limit: i64, window_seconds: i64) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let (count,): (i64,) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .expire(key, window_seconds)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(count <= limit)
    }
}

#[async_trait]
impl TaskQueue for RedisClient {
    async fn enqueue(&self, queue: &str, job: &str) -> Result<(), PublishError> {
        self.push_job(queue, job)
            .await
            .map_err(|e| PublishError(e.to_string()))
    }
}
