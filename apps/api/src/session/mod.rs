//! Session context — the only state kept between steps of the interview flow.
//!
//! Each session is stored under two well-known keys: a session marker and the
//! serialized question list. There is no expiry or versioning. A missing or
//! unreadable entry means "no session" and the user has to start over.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extraction::NumberedBlock;

pub mod memory;
pub mod redis_store;

pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;

const KEY_PREFIX: &str = "coach";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Everything remembered about one session between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,
    pub jd_uploaded: bool,
    pub job_title: Option<String>,
    pub questions: Vec<NumberedBlock>,
    pub updated_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            jd_uploaded: false,
            job_title: None,
            questions: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// The session marker, i.e. everything except the question list.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SessionMarker {
    pub session_id: String,
    pub jd_uploaded: bool,
    pub job_title: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SessionMarker {
    pub(crate) fn of(context: &SessionContext) -> Self {
        Self {
            session_id: context.session_id.clone(),
            jd_uploaded: context.jd_uploaded,
            job_title: context.job_title.clone(),
            updated_at: context.updated_at,
        }
    }
}

pub(crate) fn marker_key(session_id: &str) -> String {
    format!("{KEY_PREFIX}:session:{session_id}")
}

pub(crate) fn questions_key(session_id: &str) -> String {
    format!("{KEY_PREFIX}:questions:{session_id}")
}

/// Serializes a context into (marker, questions) values.
pub(crate) fn encode(context: &SessionContext) -> Result<(String, String), SessionError> {
    Ok((
        serde_json::to_string(&SessionMarker::of(context))?,
        serde_json::to_string(&context.questions)?,
    ))
}

/// Rebuilds a context from its two stored values. Anything unreadable is `None`.
pub(crate) fn decode(marker: Option<&str>, questions: Option<&str>) -> Option<SessionContext> {
    let marker: SessionMarker = serde_json::from_str(marker?).ok()?;
    let questions: Vec<NumberedBlock> = match questions {
        Some(raw) => serde_json::from_str(raw).ok()?,
        None => Vec::new(),
    };
    Some(SessionContext {
        session_id: marker.session_id,
        jd_uploaded: marker.jd_uploaded,
        job_title: marker.job_title,
        questions,
        updated_at: marker.updated_at,
    })
}

/// Storage for session contexts. Carried in `AppState` as `Arc<dyn SessionStore>`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns `None` when the session is unknown or its entries are corrupt.
    async fn get(&self, session_id: &str) -> Result<Option<SessionContext>, SessionError>;

    async fn put(&self, context: &SessionContext) -> Result<(), SessionError>;

    async fn clear(&self, session_id: &str) -> Result<(), SessionError>;

    fn backend_name(&self) -> &'static str;
}
