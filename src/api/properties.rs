use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::types::{MessageResponse, PropertyDto, PropertyRequest};
use super::validation::{ValidProperty, validate_property_create, validate_property_update};
use super::{ApiError, AppState};
use crate::db::PropertyFields;

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    #[serde(rename = "userId")]
    pub user_id: i32,
}

/// Creates a listing with its initial image set in one step.
pub async fn create_property(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PropertyRequest>,
) -> Result<(StatusCode, Json<PropertyDto>), ApiError> {
    let ValidProperty {
        title,
        description,
        price,
        latitude,
        longitude,
        user_id,
        images,
    } = validate_property_create(payload)?;

    // Cheap existence check up front; the foreign key still decides on races.
    if state.store().get_user_by_id(user_id).await?.is_none() {
        return Err(ApiError::user_not_found(user_id));
    }

    let fields = PropertyFields {
        title,
        description,
        price,
        latitude,
        longitude,
    };

    let created = state
        .store()
        .create_property(user_id, fields, &images)
        .await?
        .ok_or_else(|| ApiError::user_not_found(user_id))?;

    Ok((StatusCode::CREATED, Json(PropertyDto::from(created))))
}

pub async fn list_properties(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PropertyDto>>, ApiError> {
    let listings = state.store().list_properties().await?;

    let properties: Vec<PropertyDto> = listings.into_iter().map(PropertyDto::from).collect();
    Ok(Json(properties))
}

/// Lists one owner's properties. An owner with zero listings is reported
/// as not found rather than as an empty collection.
pub async fn list_by_owner(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<PropertyDto>>, ApiError> {
    let listings = state
        .store()
        .list_properties_by_owner(query.user_id)
        .await?;

    if listings.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No properties found for user {}",
            query.user_id
        )));
    }

    let properties: Vec<PropertyDto> = listings.into_iter().map(PropertyDto::from).collect();
    Ok(Json(properties))
}

pub async fn get_property(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<PropertyDto>, ApiError> {
    let property = state
        .store()
        .get_property(id)
        .await?
        .ok_or_else(|| ApiError::property_not_found(id))?;

    Ok(Json(PropertyDto::from(property)))
}

/// Rewrites a listing's fields and replaces its image set atomically.
/// Ownership never moves on update; the stored owner wins.
pub async fn update_property(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<PropertyRequest>,
) -> Result<Json<PropertyDto>, ApiError> {
    let ValidProperty {
        title,
        description,
        price,
        latitude,
        longitude,
        images,
        ..
    } = validate_property_update(payload)?;

    if state.store().get_property(id).await?.is_none() {
        return Err(ApiError::property_not_found(id));
    }

    let fields = PropertyFields {
        title,
        description,
        price,
        latitude,
        longitude,
    };

    let updated = state
        .store()
        .update_property(id, fields, &images)
        .await?
        .ok_or_else(|| ApiError::property_not_found(id))?;

    Ok(Json(PropertyDto::from(updated)))
}

pub async fn delete_property(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = state.store().remove_property(id).await?;
    if !removed {
        return Err(ApiError::property_not_found(id));
    }

    Ok(Json(MessageResponse {
        message: "Property deleted successfully".to_string(),
    }))
}
