use url::Url;

use super::ApiError;
use super::types::{LoginRequest, PropertyRequest, RegisterRequest};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 6;

#[derive(Debug)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct ValidLogin {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct ValidProperty {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub user_id: i32,
    pub images: Vec<String>,
}

pub fn validate_registration(payload: RegisterRequest) -> Result<ValidRegistration, ApiError> {
    let name = required_text(payload.name, "Name is required")?;
    let email = validate_email(payload.email)?;
    let username = validate_username(payload.username)?;
    let password = validate_password(payload.password)?;

    Ok(ValidRegistration {
        name,
        email,
        username,
        password,
    })
}

pub fn validate_login(payload: LoginRequest) -> Result<ValidLogin, ApiError> {
    let username = validate_username(payload.username)?;
    let password = validate_password(payload.password)?;

    Ok(ValidLogin { username, password })
}

/// Validates a creation payload. Creation must carry at least one image;
/// updates may replace the set with an empty one.
pub fn validate_property_create(payload: PropertyRequest) -> Result<ValidProperty, ApiError> {
    let property = validate_property_fields(payload)?;
    if property.images.is_empty() {
        return Err(ApiError::validation("At least one image is required"));
    }
    Ok(property)
}

pub fn validate_property_update(payload: PropertyRequest) -> Result<ValidProperty, ApiError> {
    validate_property_fields(payload)
}

fn validate_property_fields(payload: PropertyRequest) -> Result<ValidProperty, ApiError> {
    let title = required_text(payload.title, "Title is required")?;
    let description = required_text(payload.description, "Description is required")?;

    let price = payload
        .price
        .ok_or_else(|| ApiError::validation("Price is required"))?;
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::validation(
            "Price must be a non-negative number",
        ));
    }

    let latitude = validate_coordinate(payload.latitude, "Latitude")?;
    let longitude = validate_coordinate(payload.longitude, "Longitude")?;

    let user_id = payload
        .user_id
        .ok_or_else(|| ApiError::validation("userId is required"))?;
    if user_id <= 0 {
        return Err(ApiError::validation("userId must be a positive integer"));
    }

    let images = payload.images.unwrap_or_default();
    for url in &images {
        if Url::parse(url).is_err() {
            return Err(ApiError::validation(format!(
                "Image URL '{}' is not a valid URL",
                url
            )));
        }
    }

    Ok(ValidProperty {
        title,
        description,
        price,
        latitude,
        longitude,
        user_id,
        images,
    })
}

fn required_text(value: Option<String>, message: &str) -> Result<String, ApiError> {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        return Err(ApiError::validation(message));
    }
    Ok(value)
}

fn validate_email(email: Option<String>) -> Result<String, ApiError> {
    let email = required_text(email, "Email is required")?;
    if !email_shape_is_valid(&email) {
        return Err(ApiError::validation("Email must be a valid email address"));
    }
    Ok(email)
}

fn email_shape_is_valid(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    domain.contains('.')
}

fn validate_username(username: Option<String>) -> Result<String, ApiError> {
    let username = username.unwrap_or_default();
    let username = username.trim();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&username.chars().count()) {
        return Err(ApiError::validation(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }
    Ok(username.to_string())
}

fn validate_password(password: Option<String>) -> Result<String, ApiError> {
    let password = password.unwrap_or_default();
    if password.chars().count() < PASSWORD_MIN {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN
        )));
    }
    Ok(password)
}

fn validate_coordinate(value: Option<f64>, field: &str) -> Result<f64, ApiError> {
    let value = value.ok_or_else(|| ApiError::validation(format!("{} is required", field)))?;
    if !value.is_finite() {
        return Err(ApiError::validation(format!("{} must be a number", field)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property_payload() -> PropertyRequest {
        PropertyRequest {
            title: Some("Lakeside cabin".to_string()),
            description: Some("Two bedrooms, private dock".to_string()),
            price: Some(185_000.0),
            latitude: Some(61.2176),
            longitude: Some(-149.8997),
            user_id: Some(1),
            images: Some(vec!["https://cdn.example.com/cabin.jpg".to_string()]),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email(Some("ada@example.com".to_string())).is_ok());
        assert!(validate_email(Some("  ada@example.com  ".to_string())).is_ok());
        assert!(validate_email(Some("no-at-sign".to_string())).is_err());
        assert!(validate_email(Some("ada@nodot".to_string())).is_err());
        assert!(validate_email(Some("ada@.example.com".to_string())).is_err());
        assert!(validate_email(Some("ada bad@example.com".to_string())).is_err());
        assert!(validate_email(Some(String::new())).is_err());
        assert!(validate_email(None).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username(Some("ada".to_string())).is_ok());
        assert!(validate_username(Some("a".repeat(30))).is_ok());
        assert!(validate_username(Some("ab".to_string())).is_err());
        assert!(validate_username(Some("a".repeat(31))).is_err());
        assert!(validate_username(None).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password(Some("hunter2!".to_string())).is_ok());
        assert!(validate_password(Some("short".to_string())).is_err());
        assert!(validate_password(None).is_err());
    }

    #[test]
    fn test_registration_reports_first_violation() {
        let payload = RegisterRequest {
            name: None,
            email: Some("bad".to_string()),
            username: Some("x".to_string()),
            password: None,
        };
        let Err(ApiError::ValidationError(msg)) = validate_registration(payload) else {
            panic!("expected a validation error");
        };
        assert_eq!(msg, "Name is required");
    }

    #[test]
    fn test_validate_property_price() {
        let mut payload = property_payload();
        payload.price = Some(-1.0);
        assert!(validate_property_create(payload).is_err());

        let mut payload = property_payload();
        payload.price = Some(0.0);
        assert!(validate_property_create(payload).is_ok());

        let mut payload = property_payload();
        payload.price = None;
        assert!(validate_property_create(payload).is_err());
    }

    #[test]
    fn test_validate_property_coordinates() {
        let mut payload = property_payload();
        payload.latitude = None;
        assert!(validate_property_create(payload).is_err());

        let mut payload = property_payload();
        payload.longitude = Some(f64::NAN);
        assert!(validate_property_create(payload).is_err());
    }

    #[test]
    fn test_validate_property_owner() {
        let mut payload = property_payload();
        payload.user_id = Some(0);
        assert!(validate_property_create(payload).is_err());

        let mut payload = property_payload();
        payload.user_id = None;
        assert!(validate_property_create(payload).is_err());
    }

    #[test]
    fn test_validate_property_images() {
        let mut payload = property_payload();
        payload.images = Some(vec!["not a url".to_string()]);
        assert!(validate_property_create(payload).is_err());

        let mut payload = property_payload();
        payload.images = Some(Vec::new());
        assert!(validate_property_create(payload).is_err());

        let mut payload = property_payload();
        payload.images = None;
        assert!(validate_property_update(payload).is_ok());
    }
}
