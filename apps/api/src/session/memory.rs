use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::session::{
    decode, encode, marker_key, questions_key, SessionContext, SessionError, SessionStore,
};

/// Process-local store. Holds the same two encoded entries per session as
/// the Redis store, so both read corrupt data the same way.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn insert_raw(&self, key: String, value: String) {
        self.entries.write().await.insert(key, value);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<SessionContext>, SessionError> {
        let entries = self.entries.read().await;
        Ok(decode(
            entries.get(&marker_key(session_id)).map(String::as_str),
            entries.get(&questions_key(session_id)).map(String::as_str),
        ))
    }

    async fn put(&self, context: &SessionContext) -> Result<(), SessionError> {
        let (marker, questions) = encode(context)?;
        let mut entries = self.entries.write().await;
        entries.insert(marker_key(&context.session_id), marker);
        entries.insert(questions_key(&context.session_id), questions);
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.write().await;
        entries.remove(&marker_key(session_id));
        entries.remove(&questions_key(session_id));
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
