use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

use crate::session::{
    decode, encode, marker_key, questions_key, SessionContext, SessionError, SessionStore,
};

/// Redis-backed store, enabled when `REDIS_URL` is set. Keys never expire.
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: MultiplexedConnection,
}

impl RedisSessionStore {
    pub async fn connect(redis_url: &str) -> Result<Self, SessionError> {
        let client = redis::Client::open(redis_url)?;
        let connection = client.get_multiplexed_async_connection().await?;
        info!("Redis session store connected");
        Ok(Self { connection })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<SessionContext>, SessionError> {
        let mut conn = self.connection.clone();
        let (marker, questions): (Option<String>, Option<String>) = redis::pipe()
            .get(marker_key(session_id))
            .get(questions_key(session_id))
            .query_async(&mut conn)
            .await?;
        Ok(decode(marker.as_deref(), questions.as_deref()))
    }

    async fn put(&self, context: &SessionContext) -> Result<(), SessionError> {
        let (marker, questions) = encode(context)?;
        let mut conn = self.connection.clone();
        redis::pipe()
            .atomic()
            .set(marker_key(&context.session_id), marker)
            .ignore()
            .set(questions_key(&context.session_id), questions)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), SessionError> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(vec![marker_key(session_id), questions_key(session_id)])
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::NumberedBlock;

    /// Runs against a live server only when `REDIS_URL` is set.
    async fn store_from_env() -> Option<RedisSessionStore> {
        let url = std::env::var("REDIS_URL").ok()?;
        Some(RedisSessionStore::connect(&url).await.unwrap())
    }

    fn unique_id(tag: &str) -> String {
        format!("test-{tag}-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
    }

    #[tokio::test]
    async fn test_redis_put_get_clear() {
        let Some(store) = store_from_env().await else {
            return;
        };
        let id = unique_id("roundtrip");
        let mut context = SessionContext::new(id.as_str());
        context.jd_uploaded = true;
        context.job_title = Some("Backend Engineer".to_string());
        context.questions = vec![NumberedBlock {
            ordinal: Some(1),
            text: "1. Why Rust?".to_string(),
        }];

        store.put(&context).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), Some(context));

        store.clear(&id).await.unwrap();
        assert_eq!(store.get(&id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_corrupt_questions_are_no_session() {
        let Some(store) = store_from_env().await else {
            return;
        };
        let id = unique_id("corrupt");
        store.put(&SessionContext::new(id.as_str())).await.unwrap();

        let mut conn = store.connection.clone();
        conn.set::<_, _, ()>(questions_key(&id), "{not json")
            .await
            .unwrap();
        assert_eq!(store.get(&id).await.unwrap(), None);

        store.clear(&id).await.unwrap();
    }
}
