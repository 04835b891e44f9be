use axum::{Json, extract::State};
use std::sync::Arc;

use super::types::{GoogleLoginRequest, LoginRequest, SessionResponse, UserDto};
use super::validation::validate_login;
use super::{ApiError, AppState};

/// Checks a username/password pair. The response never reveals whether
/// the username or the password was the wrong half.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let valid = validate_login(payload)?;

    let user = state
        .accounts()
        .login(&valid.username, &valid.password)
        .await?;

    Ok(Json(SessionResponse {
        message: "Login successful".to_string(),
        user: UserDto::from(user),
    }))
}

/// Signs a user in with a Google ID token, provisioning the account on
/// first sight of the email.
pub async fn google_login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GoogleLoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let id_token = payload
        .id_token
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::validation("id_token is required"))?;

    let user = state.accounts().login_with_identity(&id_token).await?;

    Ok(Json(SessionResponse {
        message: "Login successful".to_string(),
        user: UserDto::from(user),
    }))
}
