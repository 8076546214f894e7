//! Axum route handlers for login and registration.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::backend_client::payloads::{LoginRequest, RegisterRequest, UserProfile};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password required".to_string(),
        ));
    }

    let user = state
        .backend
        .login(&LoginRequest {
            email: email.to_string(),
            password: form.password,
        })
        .await?;

    info!("User logged in");
    Ok(Json(LoginResponse { user }))
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let request = RegisterRequest {
        name: form.name.trim().to_string(),
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
    };
    if request.name.is_empty()
        || request.username.is_empty()
        || request.email.is_empty()
        || request.password.is_empty()
    {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    let message = state
        .backend
        .register(&request)
        .await?
        .unwrap_or_else(|| "Registration successful".to_string());

    info!("Registered user '{}'", request.username);
    Ok((StatusCode::CREATED, Json(RegisterResponse { message })))
}
