//! Account creation against an identity service.
//!
//! The identity service issues the id that keys each user profile document.
//! It is independent of the document store: accounts created here are not
//! rolled back if a later write fails.

pub mod firebase;
pub mod memory;
pub mod password;
pub mod sql;

use async_trait::async_trait;
use thiserror::Error;

pub use firebase::FirebaseIdentityProvider;
pub use memory::MemoryIdentityProvider;
pub use sql::SqlIdentityProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub disabled: bool,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("an account already exists for {email}")]
    EmailExists { email: String },

    #[error("identity service rejected {email}: {message}")]
    Rejected { email: String, message: String },

    #[error("password rejected: {0}")]
    Password(String),

    #[error("identity service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("access token unavailable: {0}")]
    Auth(#[from] crate::google::CredentialError),

    #[error("account database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Registers an account and returns the id the service assigned to it.
    async fn create_identity(&self, identity: &NewIdentity) -> Result<String, IdentityError>;
}
