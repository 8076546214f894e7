pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::interview::handlers as interview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/register", post(auth::handle_register))
        // Interview flow
        .route("/api/v1/resume", post(interview::handle_upload_resume))
        .route("/api/v1/jd", post(interview::handle_upload_jd))
        .route("/api/v1/match-score", post(interview::handle_match_score))
        .route(
            "/api/v1/questions",
            post(interview::handle_generate_questions),
        )
        .route(
            "/api/v1/questions/:session_id",
            get(interview::handle_get_questions),
        )
        .route("/api/v1/answers", post(interview::handle_submit_answer))
        .route(
            "/api/v1/session/:session_id",
            delete(interview::handle_clear_session),
        )
        .with_state(state)
}
