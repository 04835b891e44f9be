//! External identity verification.
//!
//! Login can be delegated to a trusted identity provider; the provider
//! attests to the user's email and display name, and the account is then
//! upserted by email.

use async_trait::async_trait;
use thiserror::Error;

/// Claims extracted from a verified identity token.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

/// Errors specific to identity verification.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The token failed verification (signature, audience, issuer or expiry).
    #[error("Invalid identity token")]
    InvalidToken,

    /// The provider could not be reached or gave an unusable answer.
    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Verifies bearer tokens issued by a trusted identity provider.
///
/// Implementations must fail closed: anything short of a fully verified
/// token is [`IdentityError::InvalidToken`].
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError>;
}
