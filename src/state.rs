use std::sync::Arc;

use crate::clients::GoogleAuthClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{AccountService, CredentialService, IdentityVerifier, SeaOrmAccountService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub accounts: Arc<dyn AccountService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let identity: Option<Arc<dyn IdentityVerifier>> = if config.google.client_id.is_empty() {
            None
        } else {
            Some(Arc::new(GoogleAuthClient::new(
                config.google.client_id.clone(),
            )))
        };

        Self::init_with_identity(config, identity).await
    }

    /// Builds the state around a caller-provided identity verifier. Tests
    /// use this to stand in for the Google endpoint.
    pub async fn with_identity_verifier(
        config: Config,
        identity: Arc<dyn IdentityVerifier>,
    ) -> anyhow::Result<Self> {
        Self::init_with_identity(config, Some(identity)).await
    }

    async fn init_with_identity(
        config: Config,
        identity: Option<Arc<dyn IdentityVerifier>>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let credentials = CredentialService::new(config.security.clone());

        let accounts = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            credentials,
            identity,
        )) as Arc<dyn AccountService>;

        Ok(Self {
            config,
            store,
            accounts,
        })
    }
}
