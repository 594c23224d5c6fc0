use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{IdentityError, IdentityProvider, NewIdentity};
use crate::google::TokenSource;

const PRODUCTION_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
const EMULATOR_BEARER: &str = "owner";
const DUPLICATE_EMAIL_CODES: [&str; 2] = ["EMAIL_EXISTS", "DUPLICATE_EMAIL"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountRequest<'a> {
    email: &'a str,
    password: &'a str,
    display_name: &'a str,
    disabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountResponse {
    local_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Creates accounts through the Identity Toolkit admin API, the service
/// behind Firebase Authentication.
pub struct FirebaseIdentityProvider {
    http: reqwest::Client,
    accounts_url: String,
    tokens: Option<Arc<TokenSource>>,
}

impl FirebaseIdentityProvider {
    pub fn new(http: reqwest::Client, project_id: &str, tokens: Arc<TokenSource>) -> Self {
        Self {
            http,
            accounts_url: accounts_url(PRODUCTION_BASE, project_id),
            tokens: Some(tokens),
        }
    }

    pub fn emulator(http: reqwest::Client, host: &str, project_id: &str) -> Self {
        let base = format!(
            "http://{}/identitytoolkit.googleapis.com/v1",
            host.trim_end_matches('/')
        );
        Self {
            http,
            accounts_url: accounts_url(&base, project_id),
            tokens: None,
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    fn backend(&self) -> &'static str {
        "firebase"
    }

    async fn create_identity(&self, identity: &NewIdentity) -> Result<String, IdentityError> {
        let bearer = match &self.tokens {
            Some(tokens) => tokens.token().await?,
            None => EMULATOR_BEARER.to_string(),
        };

        let response = self
            .http
            .post(&self.accounts_url)
            .bearer_auth(bearer)
            .json(&CreateAccountRequest {
                email: &identity.email,
                password: &identity.password,
                display_name: &identity.display_name,
                disabled: identity.disabled,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(&identity.email, status.as_u16(), &body));
        }

        let created: CreateAccountResponse = response.json().await?;
        Ok(created.local_id)
    }
}

fn accounts_url(base: &str, project_id: &str) -> String {
    format!("{base}/projects/{project_id}/accounts")
}

fn classify_error(email: &str, status: u16, body: &str) -> IdentityError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());

    // Messages look like "EMAIL_EXISTS" or "DUPLICATE_EMAIL : details".
    let code = message.split([' ', ':']).next().unwrap_or_default();
    if DUPLICATE_EMAIL_CODES.contains(&code) {
        return IdentityError::EmailExists {
            email: email.to_string(),
        };
    }

    IdentityError::Rejected {
        email: email.to_string(),
        message: format!("status {status}: {message}"),
    }
}
