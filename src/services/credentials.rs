//! Password hashing and verification.
//!
//! Argon2id with cost parameters from [`SecurityConfig`]. Hashing and
//! verification are CPU-intensive and run on the blocking pool so they
//! never stall the async runtime.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task;

use crate::config::SecurityConfig;

#[derive(Clone)]
pub struct CredentialService {
    config: SecurityConfig,
}

impl CredentialService {
    #[must_use]
    pub const fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    /// Hash a password. Salted, so two calls never produce the same digest.
    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let config = self.config.clone();

        task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .context("Password hashing task panicked")?
    }

    /// Verify a password against a stored digest. A mismatch is `Ok(false)`;
    /// only a malformed digest is an error.
    pub async fn verify(&self, password: &str, digest: &str) -> Result<bool> {
        let password = password.to_string();
        let digest = digest.to_string();

        task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&digest)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")?
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_config() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[tokio::test]
    async fn digest_differs_from_plaintext_and_verifies() {
        let creds = CredentialService::new(cheap_config());

        let digest = creds.hash("hunter22").await.unwrap();
        assert_ne!(digest, "hunter22");
        assert!(creds.verify("hunter22", &digest).await.unwrap());
        assert!(!creds.verify("hunter23", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn identical_passwords_get_different_digests() {
        let creds = CredentialService::new(cheap_config());

        let first = creds.hash("same-password").await.unwrap();
        let second = creds.hash("same-password").await.unwrap();
        assert_ne!(first, second);

        assert!(creds.verify("same-password", &first).await.unwrap());
        assert!(creds.verify("same-password", &second).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_digest_is_an_error_not_a_mismatch() {
        let creds = CredentialService::new(cheap_config());

        assert!(creds.verify("anything", "not-a-digest").await.is_err());
    }
}
