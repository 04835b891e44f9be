use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::types::{RegisterRequest, UserDto};
use super::validation::validate_registration;
use super::{ApiError, AppState};
use crate::services::NewAccount;

/// Registers a new account and returns the stored user without its
/// credential digest.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let valid = validate_registration(payload)?;

    let user = state
        .accounts()
        .register(NewAccount {
            name: valid.name,
            email: valid.email,
            username: valid.username,
            password: valid.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state
        .store()
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::user_not_found(id))?;

    Ok(Json(UserDto::from(user)))
}
