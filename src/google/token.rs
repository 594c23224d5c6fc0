use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{CredentialError, ServiceAccountKey};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_TTL_SECS: i64 = 3600;
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Exchanges signed service-account assertions for access tokens and caches
/// the current one until it is about to expire.
pub struct TokenSource {
    http: reqwest::Client,
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    scope: String,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenSource {
    pub fn new(
        http: reqwest::Client,
        key: ServiceAccountKey,
        scope: &str,
    ) -> Result<Self, CredentialError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        Ok(Self {
            http,
            key,
            signing_key,
            scope: scope.to_string(),
            cached: Mutex::new(None),
        })
    }

    pub async fn token(&self) -> Result<String, CredentialError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let token = self.fetch(now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, CredentialError> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_TTL_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.typ = Some("JWT".into());
        header.kid = self.key.private_key_id.clone();
        Ok(encode(&header, &claims, &self.signing_key)?)
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<AccessToken, CredentialError> {
        let assertion = self.assertion(now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = body.expires_in, "obtained access token");
        Ok(AccessToken {
            value: body.access_token,
            expires_at: now + Duration::seconds(body.expires_in),
        })
    }
}

fn default_expires_in() -> i64 {
    ASSERTION_TTL_SECS
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use mockito::Matcher;

    use super::{AccessToken, JWT_BEARER_GRANT, TokenSource};
    use crate::google::{CLOUD_PLATFORM_SCOPE, CredentialError, ServiceAccountKey};

    const TEST_PRIVATE_KEY: &str = include_str!("../../tests/fixtures/service_account_test_key.pem");

    fn token_source(server: &mockito::ServerGuard) -> TokenSource {
        let key = ServiceAccountKey {
            project_id: Some("demo-mobievent".to_string()),
            private_key_id: Some("key-1".to_string()),
            private_key: TEST_PRIVATE_KEY.to_string(),
            client_email: "seeder@demo-mobievent.iam.gserviceaccount.com".to_string(),
            token_uri: format!("{}/token", server.url()),
        };
        TokenSource::new(reqwest::Client::new(), key, CLOUD_PLATFORM_SCOPE)
            .expect("test key should load")
    }

    #[test]
    fn token_is_stale_inside_the_expiry_margin() {
        let now = Utc::now();
        let fresh = AccessToken {
            value: "a".into(),
            expires_at: now + Duration::minutes(30),
        };
        let nearly_expired = AccessToken {
            value: "b".into(),
            expires_at: now + Duration::seconds(30),
        };

        assert!(fresh.is_fresh(now));
        assert!(!nearly_expired.is_fresh(now));
    }

    #[tokio::test]
    async fn exchanges_assertion_once_and_reuses_the_token() {
        let mut server = mockito::Server::new_async().await;
        let exchange = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), JWT_BEARER_GRANT.into()),
                Matcher::Regex("assertion=[A-Za-z0-9_-]+\\.[A-Za-z0-9_-]+\\.".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "ya29.seed", "expires_in": 3600, "token_type": "Bearer"}"#)
            .expect(1)
            .create_async()
            .await;
        let tokens = token_source(&server);

        assert_eq!(tokens.token().await.unwrap(), "ya29.seed");
        assert_eq!(tokens.token().await.unwrap(), "ya29.seed");
        exchange.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_exchange_keeps_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _exchange = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create_async()
            .await;

        let err = token_source(&server)
            .token()
            .await
            .expect_err("rejected grant should fail");

        assert!(
            matches!(err, CredentialError::Rejected { status: 400, ref body } if body.contains("invalid_grant")),
            "unexpected error: {err}"
        );
    }
}
