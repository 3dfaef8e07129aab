//! Token acquisition, caching, and refresh.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Error, Result};

/// Environment variable holding the OAuth client ID.
pub(crate) const ENV_CLIENT_ID: &str = "MERIDIAN_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub(crate) const ENV_CLIENT_SECRET: &str = "MERIDIAN_CLIENT_SECRET";
/// Environment variable holding the optional token scope.
pub(crate) const ENV_SCOPE: &str = "MERIDIAN_SCOPE";

/// Credentials used to obtain access tokens.
///
/// Secrets are wrapped in [`SecretString`] and never appear in `Debug`
/// output.
#[derive(Clone)]
pub enum Credentials {
    /// OAuth2 client-credentials grant. The standard choice for
    /// server-to-server integrations.
    ClientCredentials {
        /// OAuth client ID
        client_id: String,
        /// OAuth client secret
        client_secret: SecretString,
        /// Optional space-separated scope
        scope: Option<String>,
    },
    /// OAuth2 authorization-code grant, for tokens acting on behalf of an
    /// end user. The code is single-use; renewals use the refresh token
    /// issued with the first exchange.
    AuthorizationCode {
        /// OAuth client ID
        client_id: String,
        /// OAuth client secret
        client_secret: SecretString,
        /// Authorization code from the consent redirect
        code: SecretString,
        /// Redirect URI the code was issued for
        redirect_uri: String,
    },
    /// A refresh token obtained out-of-band.
    RefreshToken {
        /// OAuth client ID
        client_id: String,
        /// OAuth client secret
        client_secret: SecretString,
        /// Long-lived refresh token
        refresh_token: SecretString,
    },
}

impl Credentials {
    /// Client-credentials grant from `MERIDIAN_CLIENT_ID`,
    /// `MERIDIAN_CLIENT_SECRET`, and optional `MERIDIAN_SCOPE`.
    pub fn from_env() -> Result<Self> {
        let client_id = std::env::var(ENV_CLIENT_ID)
            .map_err(|_| Error::Config(format!("{} is not set", ENV_CLIENT_ID)))?;
        let client_secret = std::env::var(ENV_CLIENT_SECRET)
            .map_err(|_| Error::Config(format!("{} is not set", ENV_CLIENT_SECRET)))?;

        Ok(Credentials::ClientCredentials {
            client_id,
            client_secret: SecretString::from(client_secret),
            scope: std::env::var(ENV_SCOPE).ok(),
        })
    }

    /// Convenience constructor for the client-credentials grant.
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Credentials::ClientCredentials {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            scope: None,
        }
    }

    fn client_id(&self) -> &str {
        match self {
            Credentials::ClientCredentials { client_id, .. }
            | Credentials::AuthorizationCode { client_id, .. }
            | Credentials::RefreshToken { client_id, .. } => client_id,
        }
    }

    fn client_secret(&self) -> &SecretString {
        match self {
            Credentials::ClientCredentials { client_secret, .. }
            | Credentials::AuthorizationCode { client_secret, .. }
            | Credentials::RefreshToken { client_secret, .. } => client_secret,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let grant = match self {
            Credentials::ClientCredentials { .. } => "client_credentials",
            Credentials::AuthorizationCode { .. } => "authorization_code",
            Credentials::RefreshToken { .. } => "refresh_token",
        };
        f.debug_struct("Credentials")
            .field("grant", &grant)
            .field("client_id", &self.client_id())
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Manages the access token for a client.
///
/// # Thread Safety
///
/// `Authenticator` is shared across tasks; internal locking makes refresh
/// safe under concurrent requests, and only one grant is in flight at a
/// time.
#[derive(Clone)]
pub struct Authenticator {
    http: reqwest::Client,
    token_url: String,
    credentials: Credentials,
    refresh_buffer: Duration,
    inner: Arc<RwLock<AuthInner>>,
}

#[derive(Default)]
struct AuthInner {
    token: Option<CachedToken>,
    /// Set once an authorization code has been redeemed; the code cannot
    /// be exchanged a second time.
    code_redeemed: bool,
}

struct CachedToken {
    access_token: SecretString,
    expires_at: DateTime<Utc>,
    refresh_token: Option<SecretString>,
}

impl CachedToken {
    fn is_valid(&self, buffer: Duration) -> bool {
        Utc::now() + buffer < self.expires_at
    }
}

impl Authenticator {
    pub(crate) fn new(
        credentials: Credentials,
        token_url: String,
        http: reqwest::Client,
        refresh_buffer_secs: i64,
    ) -> Self {
        Self {
            http,
            token_url,
            credentials,
            refresh_buffer: Duration::seconds(refresh_buffer_secs),
            inner: Arc::new(RwLock::new(AuthInner::default())),
        }
    }

    /// Get a bearer token, performing the initial grant or a refresh if the
    /// cached token is missing or expiring within the buffer.
    pub async fn bearer_token(&self) -> Result<SecretString> {
        {
            let inner = self.inner.read().await;
            if let Some(token) = &inner.token {
                if token.is_valid(self.refresh_buffer) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut inner = self.inner.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = &inner.token {
            if token.is_valid(self.refresh_buffer) {
                return Ok(token.access_token.clone());
            }
        }

        self.acquire(&mut inner).await
    }

    /// Force a new access token, regardless of the cached token's expiry.
    ///
    /// Used by the client after a 401 response: the server has rejected the
    /// token, so local expiry bookkeeping cannot be trusted.
    pub async fn refresh(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        self.acquire(&mut inner).await?;
        Ok(())
    }

    /// Expiry of the cached token, if one is held.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.token.as_ref().map(|t| t.expires_at)
    }

    async fn acquire(&self, inner: &mut AuthInner) -> Result<SecretString> {
        let refresh_token = inner
            .token
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
            .or_else(|| match &self.credentials {
                Credentials::RefreshToken { refresh_token, .. } => Some(refresh_token.clone()),
                _ => None,
            });

        let response = match (&self.credentials, &refresh_token) {
            // A held refresh token always wins; it renews both the
            // authorization-code and refresh-token flows.
            (_, Some(refresh_token)) => self.refresh_token_grant(refresh_token).await?,
            (Credentials::ClientCredentials { scope, .. }, None) => {
                self.client_credentials_grant(scope.as_deref()).await?
            }
            (
                Credentials::AuthorizationCode {
                    code, redirect_uri, ..
                },
                None,
            ) => {
                if inner.code_redeemed {
                    return Err(Error::Authentication(
                        "authorization code already redeemed and no refresh token was issued"
                            .into(),
                    ));
                }
                let response = self.authorization_code_grant(code, redirect_uri).await?;
                inner.code_redeemed = true;
                response
            }
            (Credentials::RefreshToken { .. }, None) => unreachable!("seed refresh token is set"),
        };

        tracing::debug!(
            expires_in = response.expires_in,
            has_refresh_token = response.refresh_token.is_some(),
            "obtained access token"
        );

        let access_token = SecretString::from(response.access_token);
        inner.token = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
            // Keep the old refresh token when the server does not rotate it.
            refresh_token: response
                .refresh_token
                .map(SecretString::from)
                .or(refresh_token),
        });
        Ok(access_token)
    }

    async fn client_credentials_grant(&self, scope: Option<&str>) -> Result<TokenResponse> {
        let mut params = vec![
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id()),
            ("client_secret", self.credentials.client_secret().expose_secret()),
        ];
        if let Some(scope) = scope {
            params.push(("scope", scope));
        }
        self.token_request(&params).await
    }

    async fn authorization_code_grant(
        &self,
        code: &SecretString,
        redirect_uri: &str,
    ) -> Result<TokenResponse> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code.expose_secret()),
            ("redirect_uri", redirect_uri),
            ("client_id", self.credentials.client_id()),
            ("client_secret", self.credentials.client_secret().expose_secret()),
        ];
        self.token_request(&params).await
    }

    async fn refresh_token_grant(&self, refresh_token: &SecretString) -> Result<TokenResponse> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.expose_secret()),
            ("client_id", self.credentials.client_id()),
            ("client_secret", self.credentials.client_secret().expose_secret()),
        ];
        self.token_request(&params).await
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            return Err(Error::Authentication(format!(
                "token request failed ({}): {}",
                status,
                body.get("error_description")
                    .or_else(|| body.get("error"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("no error description")
            )));
        }

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("token_url", &self.token_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

fn default_expires_in() -> i64 {
    3600
}
