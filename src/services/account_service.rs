//! Domain service for account registration and login.
//!
//! Covers local credential flows and identity-provider logins.

use thiserror::Error;

use crate::db::User;
use crate::services::identity::IdentityError;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid identity token")]
    InvalidToken,

    #[error("Identity provider is not configured")]
    IdentityUnavailable,

    #[error("Identity provider error: {0}")]
    IdentityProvider(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<IdentityError> for AccountError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidToken => Self::InvalidToken,
            IdentityError::Provider(msg) => Self::IdentityProvider(msg),
        }
    }
}

/// Field values for a new locally registered account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Domain service trait for registration and login.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Registers a new account, storing the password only as a digest.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Conflict`] when the username or email is
    /// already taken.
    async fn register(&self, new_account: NewAccount) -> Result<User, AccountError>;

    /// Verifies credentials and returns the account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] on any mismatch; an
    /// unknown username and a wrong password are indistinguishable.
    async fn login(&self, username: &str, password: &str) -> Result<User, AccountError>;

    /// Verifies an identity-provider token and upserts the account by email.
    async fn login_with_identity(&self, id_token: &str) -> Result<User, AccountError>;
}
