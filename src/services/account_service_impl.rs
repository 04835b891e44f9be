//! `SeaORM` implementation of the `AccountService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::db::{InsertUser, NewUser, Store, User};
use crate::services::account_service::{AccountError, AccountService, NewAccount};
use crate::services::credentials::CredentialService;
use crate::services::identity::IdentityVerifier;

pub struct SeaOrmAccountService {
    store: Store,
    credentials: CredentialService,
    identity: Option<Arc<dyn IdentityVerifier>>,
}

impl SeaOrmAccountService {
    #[must_use]
    pub fn new(
        store: Store,
        credentials: CredentialService,
        identity: Option<Arc<dyn IdentityVerifier>>,
    ) -> Self {
        Self {
            store,
            credentials,
            identity,
        }
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn register(&self, new_account: NewAccount) -> Result<User, AccountError> {
        // Fast-path duplicate checks; the unique indexes stay authoritative.
        if self
            .store
            .get_user_by_username(&new_account.username)
            .await?
            .is_some()
        {
            return Err(AccountError::Conflict(
                "Username is already taken".to_string(),
            ));
        }

        if self
            .store
            .get_user_by_email(&new_account.email)
            .await?
            .is_some()
        {
            return Err(AccountError::Conflict(
                "Email is already registered".to_string(),
            ));
        }

        let digest = self
            .credentials
            .hash(&new_account.password)
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        let created = self
            .store
            .create_user(NewUser {
                name: new_account.name,
                email: new_account.email,
                username: new_account.username,
                password_hash: digest,
            })
            .await?;

        match created {
            InsertUser::Created(user) => {
                info!("Registered user {} (id {})", user.username, user.id);
                Ok(user)
            }
            InsertUser::DuplicateEmail => Err(AccountError::Conflict(
                "Email is already registered".to_string(),
            )),
            InsertUser::DuplicateUsername => Err(AccountError::Conflict(
                "Username is already taken".to_string(),
            )),
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AccountError> {
        let Some((user, digest)) = self
            .store
            .get_user_by_username_with_digest(username)
            .await?
        else {
            return Err(AccountError::InvalidCredentials);
        };

        // Identity-provider accounts have no digest to check against.
        let Some(digest) = digest else {
            return Err(AccountError::InvalidCredentials);
        };

        let is_valid = self
            .credentials
            .verify(password, &digest)
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        if !is_valid {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn login_with_identity(&self, id_token: &str) -> Result<User, AccountError> {
        let verifier = self
            .identity
            .as_ref()
            .ok_or(AccountError::IdentityUnavailable)?;

        let identity = verifier.verify(id_token).await?;

        let user = self
            .store
            .upsert_user_by_email(&identity.email, &identity.name, identity.picture.as_deref())
            .await?;

        info!("Identity login for user {} (id {})", user.username, user.id);
        Ok(user)
    }
}
