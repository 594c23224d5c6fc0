//! Google service-account credentials and OAuth2 access tokens.

mod credentials;
mod token;

pub use credentials::{CredentialError, ServiceAccountKey, project_from_database_url};
pub use token::{AccessToken, TokenSource};

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
