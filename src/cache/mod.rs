use async_trait::async_trait;
use redis::{Client, RedisError, aio::ConnectionManager};
use serde::{Serialize, de::DeserializeOwned};

use crate::services::journal::JournalBackend;

#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    /// Get a value from cache
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> redis::RedisResult<Option<T>> {
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await?;

        match value {
            Some(v) => {
                let deserialized = serde_json::from_str(&v).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::TypeError,
                        "Deserialization error",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with optional TTL (in seconds)
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: Option<u64>,
    ) -> redis::RedisResult<()> {
        let serialized = serde_json::to_string(value).map_err(|e| {
            redis::RedisError::from((
                redis::ErrorKind::TypeError,
                "Serialization error",
                e.to_string(),
            ))
        })?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(serialized);

        if let Some(ttl) = ttl_seconds {
            cmd.arg("EX").arg(ttl);
        }

        cmd.query_async(&mut self.connection.clone()).await
    }

    /// Delete a key from cache
    pub async fn delete(&self, key: &str) -> redis::RedisResult<()> {
        redis::cmd("DEL")
            .arg(key)
            .query_async(&mut self.connection.clone())
            .await
    }
}

/// Journals live as one JSON array per key, without expiry.
#[async_trait]
impl JournalBackend for RedisCache {
    async fn load(&self, key: &str) -> Result<Vec<serde_json::Value>, String> {
        self.get::<Vec<serde_json::Value>>(key)
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| e.to_string())
    }

    async fn store(&self, key: &str, entries: &[serde_json::Value]) -> Result<(), String> {
        self.set(key, &entries, None).await.map_err(|e| e.to_string())
    }

    async fn clear(&self, key: &str) -> Result<(), String> {
        self.delete(key).await.map_err(|e| e.to_string())
    }
}

/// Cache key generators
pub mod keys {
    /// Admin activity log
    pub fn activity_log() -> String {
        "admin:activity_log".to_string()
    }

    /// SQL console history
    pub fn query_history() -> String {
        "admin:sql_history".to_string()
    }
}
