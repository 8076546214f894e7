use std::sync::Arc;

use crate::backend_client::BackendClient;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    /// Memory or Redis, chosen at startup from `REDIS_URL`.
    pub sessions: Arc<dyn SessionStore>,
}
