pub mod credentials;
pub use credentials::CredentialService;

pub mod identity;
pub use identity::{IdentityError, IdentityVerifier, VerifiedIdentity};

pub mod account_service;
pub mod account_service_impl;
pub use account_service::{AccountError, AccountService, NewAccount};
pub use account_service_impl::SeaOrmAccountService;
