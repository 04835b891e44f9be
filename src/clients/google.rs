use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::services::identity::{IdentityError, IdentityVerifier, VerifiedIdentity};

const TOKENINFO_API: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Claim set returned by the tokeninfo endpoint. Every value arrives as a
/// string, including numbers and booleans.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    iss: Option<String>,
    aud: Option<String>,
    exp: Option<String>,
    email: Option<String>,
    email_verified: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Clone)]
pub struct GoogleAuthClient {
    client: Client,
    client_id: String,
}

impl GoogleAuthClient {
    #[must_use]
    pub fn new(client_id: String) -> Self {
        Self {
            client: Client::new(),
            client_id,
        }
    }

    /// Check a Google ID token against the tokeninfo endpoint.
    ///
    /// Google only answers 200 for tokens whose signature it could verify;
    /// audience, issuer, expiry and email verification still have to be
    /// checked here.
    pub async fn verify_id_token(
        &self,
        id_token: &str,
    ) -> Result<VerifiedIdentity, IdentityError> {
        let response = self
            .client
            .get(TOKENINFO_API)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| IdentityError::Provider(e.to_string()))?;

        // Google reports unverifiable tokens as 4xx.
        if response.status().is_client_error() {
            return Err(IdentityError::InvalidToken);
        }

        if !response.status().is_success() {
            let status = response.status();
            return Err(IdentityError::Provider(format!(
                "tokeninfo answered {status}"
            )));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| IdentityError::Provider(e.to_string()))?;

        if info.aud.as_deref() != Some(self.client_id.as_str()) {
            warn!("Rejected identity token issued for a different audience");
            return Err(IdentityError::InvalidToken);
        }

        match info.iss.as_deref() {
            Some("accounts.google.com" | "https://accounts.google.com") => {}
            _ => return Err(IdentityError::InvalidToken),
        }

        let expired = info
            .exp
            .as_deref()
            .and_then(|exp| exp.parse::<i64>().ok())
            .is_none_or(|exp| exp <= chrono::Utc::now().timestamp());
        if expired {
            return Err(IdentityError::InvalidToken);
        }

        if info.email_verified.as_deref() != Some("true") {
            return Err(IdentityError::InvalidToken);
        }

        let email = info.email.ok_or(IdentityError::InvalidToken)?;
        let name = info.name.unwrap_or_else(|| email.clone());

        Ok(VerifiedIdentity {
            email,
            name,
            picture: info.picture,
        })
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for GoogleAuthClient {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        self.verify_id_token(id_token).await
    }
}
