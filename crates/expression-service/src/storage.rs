//! Expression storage
//!
//! The service talks to storage only through [`ExpressionStore`]. Lookup by
//! text followed by insert is not atomic; callers needing exactly-once
//! inserts under concurrency must get that from the backend.

use async_trait::async_trait;
use exprguard_common::{Error, Expression, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Storage backend for expressions
#[async_trait]
pub trait ExpressionStore: Send + Sync {
    /// Find an expression by its normalized text
    async fn find_by_text(&self, text: &str) -> Result<Option<Expression>>;

    /// Find an expression by id
    async fn find_by_id(&self, id: &str) -> Result<Option<Expression>>;

    /// Persist a new expression
    async fn insert(&self, expression: Expression) -> Result<Expression>;

    /// All stored expressions
    async fn list_all(&self) -> Result<Vec<Expression>>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    by_id: HashMap<String, Expression>,
    by_text: HashMap<String, String>,
    order: Vec<String>,
}

/// In-process store, listing expressions in insertion order
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpressionStore for MemoryStore {
    async fn find_by_text(&self, text: &str) -> Result<Option<Expression>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_text
            .get(text)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Expression>> {
        Ok(self.inner.read().await.by_id.get(id).cloned())
    }

    async fn insert(&self, expression: Expression) -> Result<Expression> {
        let mut inner = self.inner.write().await;
        inner
            .by_text
            .insert(expression.text.clone(), expression.id.clone());
        if inner
            .by_id
            .insert(expression.id.clone(), expression.clone())
            .is_none()
        {
            inner.order.push(expression.id.clone());
        }

        debug!("Stored expression {} in memory", expression.id);
        Ok(expression)
    }

    async fn list_all(&self) -> Result<Vec<Expression>> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect())
    }
}

fn storage_error(err: redis::RedisError) -> Error {
    Error::Storage(err.to_string())
}

/// Redis-backed store
///
/// Layout: `expression:{id}` holds the JSON record, `expression:text:{text}`
/// maps normalized text to id, and `expressions:all` is the set of ids.
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis
    pub async fn new(redis_url: &str) -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        info!("Connected to Redis at {}", redis_url);

        Ok(Self { conn })
    }

    fn record_key(id: &str) -> String {
        format!("expression:{}", id)
    }

    fn text_key(text: &str) -> String {
        format!("expression:text:{}", text)
    }
}

#[async_trait]
impl ExpressionStore for RedisStore {
    async fn find_by_text(&self, text: &str) -> Result<Option<Expression>> {
        let mut conn = self.conn.clone();
        let id: Option<String> = conn.get(Self::text_key(text)).await.map_err(storage_error)?;

        match id {
            Some(id) => self.find_by_id(&id).await,
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Expression>> {
        let mut conn = self.conn.clone();
        let json: Option<String> = conn.get(Self::record_key(id)).await.map_err(storage_error)?;

        match json {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, expression: Expression) -> Result<Expression> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(&expression)?;

        let _: () = conn
            .set(Self::record_key(&expression.id), json)
            .await
            .map_err(storage_error)?;
        let _: () = conn
            .set(Self::text_key(&expression.text), &expression.id)
            .await
            .map_err(storage_error)?;
        let _: () = conn
            .sadd("expressions:all", &expression.id)
            .await
            .map_err(storage_error)?;

        info!("Stored expression {} in Redis", expression.id);
        Ok(expression)
    }

    async fn list_all(&self) -> Result<Vec<Expression>> {
        let mut conn = self.conn.clone();
        let ids: Vec<String> = conn.smembers("expressions:all").await.map_err(storage_error)?;

        let mut expressions = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(expression) = self.find_by_id(id).await? {
                expressions.push(expression);
            }
        }

        Ok(expressions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, text: &str) -> Expression {
        Expression::new(id.to_string(), "Test".to_string(), text.to_string())
    }

    #[tokio::test]
    async fn test_memory_insert_and_find() {
        let store = MemoryStore::new();
        store.insert(sample("a", "x > 1")).await.unwrap();

        let by_id = store.find_by_id("a").await.unwrap().expect("Expression not found");
        assert_eq!(by_id.text, "x > 1");

        let by_text = store.find_by_text("x > 1").await.unwrap().expect("Expression not found");
        assert_eq!(by_text.id, "a");

        assert!(store.find_by_id("missing").await.unwrap().is_none());
        assert!(store.find_by_text("x > 2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_list_in_insertion_order() {
        let store = MemoryStore::new();
        store.insert(sample("b", "x > 1")).await.unwrap();
        store.insert(sample("a", "x > 2")).await.unwrap();
        store.insert(sample("c", "x > 3")).await.unwrap();

        let ids: Vec<String> = store.list_all().await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    async fn get_test_redis() -> RedisStore {
        RedisStore::new("redis://127.0.0.1:6379/15")
            .await
            .expect("Failed to connect to test Redis")
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_redis_insert_and_find() {
        let store = get_test_redis().await;
        let id = uuid::Uuid::new_v4().to_string();
        let text = format!("x > 1 && marker == '{}'", id);

        store.insert(sample(&id, &text)).await.unwrap();

        let by_id = store.find_by_id(&id).await.unwrap().expect("Expression not found");
        assert_eq!(by_id.text, text);

        let by_text = store.find_by_text(&text).await.unwrap().expect("Expression not found");
        assert_eq!(by_text.id, id);

        let all = store.list_all().await.unwrap();
        assert!(all.iter().any(|e| e.id == id));
    }
}
