use serde::{Deserialize, Serialize};

use crate::db::{PropertyWithImages, User};
use crate::entities::images;

/// Body shape shared by every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// User as it appears in responses. The stored credential digest is
/// never part of this shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub username: String,
    pub profile_pic: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            username: user.username,
            profile_pic: user.profile_pic,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDto {
    pub id: i32,
    pub url: String,
    pub property_id: i32,
}

impl From<images::Model> for ImageDto {
    fn from(image: images::Model) -> Self {
        Self {
            id: image.id,
            url: image.url,
            property_id: image.property_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDto {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub user_id: i32,
    pub created_at: String,
    pub updated_at: String,
    pub images: Vec<ImageDto>,
}

impl From<PropertyWithImages> for PropertyDto {
    fn from((property, images): PropertyWithImages) -> Self {
        Self {
            id: property.id,
            title: property.title,
            description: property.description,
            price: property.price,
            latitude: property.latitude,
            longitude: property.longitude,
            user_id: property.user_id,
            created_at: property.created_at,
            updated_at: property.updated_at,
            images: images.into_iter().map(ImageDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Registration payload. Fields are optional so a missing field surfaces
/// as a validation message instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    pub id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub user_id: Option<i32>,
    pub images: Option<Vec<String>>,
}
