//! HTTP client implementation for the Meridian API.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::api::{
    AccountsService, PayeesService, PaymentsService, TransactionsService, WebhooksService,
};
use crate::auth::{Authenticator, Credentials};
use crate::models::ApiVersion;
use crate::{Environment, Error, Result};

use super::config::{
    ClientConfig, RetryConfig, ENV_API_VERSION, ENV_BASE_URL, ENV_ENVIRONMENT, ENV_TIMEOUT_SECS,
};

/// The main client for interacting with the Meridian API.
///
/// The client owns the OAuth token lifecycle and provides access to each
/// resource through service accessors. Cloning is cheap; clones share the
/// same connection pool and token cache.
///
/// # Example
///
/// ```no_run
/// use meridian_rs::{MeridianClient, Credentials, Environment};
///
/// # async fn example() -> meridian_rs::Result<()> {
/// let client = MeridianClient::builder()
///     .credentials(Credentials::client_credentials("client-id", "client-secret"))
///     .environment(Environment::Sandbox)
///     .build()?;
///
/// let accounts = client.accounts().list().await?;
/// # Ok(())
/// # }
/// ```
pub struct MeridianClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) auth: Authenticator,
    pub(crate) config: ClientConfig,
}

impl MeridianClient {
    /// Start building a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Build a client entirely from `MERIDIAN_*` environment variables.
    ///
    /// Requires `MERIDIAN_CLIENT_ID` and `MERIDIAN_CLIENT_SECRET`; all other
    /// variables are optional. No network call is made; the first token
    /// exchange happens on the first request.
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    /// Build a client and eagerly obtain an access token.
    ///
    /// This verifies the credentials before the first resource call.
    pub async fn connect(credentials: Credentials, environment: Environment) -> Result<Self> {
        let client = Self::builder()
            .credentials(credentials)
            .environment(environment)
            .build()?;
        client.inner.auth.bearer_token().await?;
        Ok(client)
    }

    /// Create a client from credentials and an already-resolved
    /// configuration, skipping environment-variable resolution.
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let auth = Authenticator::new(
            credentials,
            config.token_url(),
            http.clone(),
            config.token_refresh_buffer_secs,
        );

        Ok(Self {
            inner: Arc::new(ClientInner { http, auth, config }),
        })
    }

    /// Get the accounts service.
    pub fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    /// Get the transactions service.
    pub fn transactions(&self) -> TransactionsService {
        TransactionsService::new(self.inner.clone())
    }

    /// Get the payments service.
    pub fn payments(&self) -> PaymentsService {
        PaymentsService::new(self.inner.clone())
    }

    /// Get the payees service.
    pub fn payees(&self) -> PayeesService {
        PayeesService::new(self.inner.clone())
    }

    /// Get the webhook endpoints service.
    pub fn webhooks(&self) -> WebhooksService {
        WebhooksService::new(self.inner.clone())
    }

    /// Manually force a token refresh.
    pub async fn refresh_token(&self) -> Result<()> {
        self.inner.auth.refresh().await
    }

    /// Get the environment this client targets.
    pub fn environment(&self) -> Environment {
        self.inner.config.environment
    }

    /// Get the resolved configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl Clone for MeridianClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for MeridianClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeridianClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Builder for [`MeridianClient`].
///
/// Each setting resolves in precedence order: explicit builder value, then
/// the corresponding `MERIDIAN_*` environment variable, then the default
/// for the selected environment.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    credentials: Option<Credentials>,
    environment: Option<Environment>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    retry: Option<RetryConfig>,
    api_version: Option<ApiVersion>,
    token_refresh_buffer_secs: Option<i64>,
}

impl ClientBuilder {
    /// Set the credentials. Falls back to `MERIDIAN_CLIENT_ID` /
    /// `MERIDIAN_CLIENT_SECRET` when unset.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the environment. Falls back to `MERIDIAN_ENVIRONMENT`, then
    /// production.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Override the base URL. Falls back to `MERIDIAN_BASE_URL`, then the
    /// environment's default.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout. Falls back to `MERIDIAN_TIMEOUT_SECS`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the retry configuration.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Pin to a specific API version. Falls back to `MERIDIAN_API_VERSION`.
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Set the buffer time before token expiry to refresh proactively.
    pub fn token_refresh_buffer(mut self, secs: i64) -> Self {
        self.token_refresh_buffer_secs = Some(secs);
        self
    }

    /// Resolve the configuration and build the client.
    ///
    /// No network call is made here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a required setting is missing or an
    /// environment variable is malformed, and [`Error::UrlParse`] when the
    /// resolved base URL is not a valid URL.
    pub fn build(self) -> Result<MeridianClient> {
        let credentials = match self.credentials {
            Some(credentials) => credentials,
            None => Credentials::from_env()?,
        };

        let environment = match self.environment {
            Some(environment) => environment,
            None => match std::env::var(ENV_ENVIRONMENT) {
                Ok(value) => value.parse()?,
                Err(_) => Environment::default(),
            },
        };

        let base_url = self
            .base_url
            .or_else(|| std::env::var(ENV_BASE_URL).ok())
            .unwrap_or_else(|| environment.api_base_url().to_string());
        // Validate early; a bad override would otherwise only surface on
        // the first request.
        Url::parse(&base_url)?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => match std::env::var(ENV_TIMEOUT_SECS) {
                Ok(value) => {
                    let secs: u64 = value.parse().map_err(|_| {
                        Error::Config(format!("{} must be an integer", ENV_TIMEOUT_SECS))
                    })?;
                    Duration::from_secs(secs)
                }
                Err(_) => Duration::from_secs(30),
            },
        };

        let api_version = match self.api_version {
            Some(version) => Some(version),
            None => match std::env::var(ENV_API_VERSION) {
                Ok(value) => Some(ApiVersion::new(&value)?),
                Err(_) => None,
            },
        };

        let mut config = ClientConfig::for_environment(environment)
            .with_base_url(base_url)
            .with_timeout(timeout);
        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        if let Some(retry) = self.retry {
            config = config.with_retry(retry);
        }
        if let Some(version) = api_version {
            config = config.with_api_version(version);
        }
        if let Some(secs) = self.token_refresh_buffer_secs {
            config = config.with_token_refresh_buffer(secs);
        }

        MeridianClient::with_config(credentials, config)
    }
}

impl ClientInner {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Build request headers with the current bearer token.
    async fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let token = self.auth.bearer_token().await?;
        let bearer = format!("Bearer {}", token.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer)
                .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(ref version) = self.config.api_version {
            headers.insert(
                "Meridian-Version",
                HeaderValue::from_str(version.as_str())
                    .map_err(|_| Error::InvalidInput("Invalid API version".to_string()))?,
            );
        }

        Ok(headers)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(self.http.get(self.url(path))).await?;
        Self::parse_data(response).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let response = self
            .execute(self.http.get(self.url(path)).query(query))
            .await?;
        Self::parse_data(response).await
    }

    /// Make a GET request, preserving the response envelope. Used by
    /// paginated endpoints that need `meta.next_cursor`.
    pub(crate) async fn get_envelope<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<ApiResponse<T>> {
        let response = self
            .execute(self.http.get(self.url(path)).query(query))
            .await?;
        Ok(response.json().await?)
    }

    /// Make a POST request.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .execute(self.http.post(self.url(path)).json(body))
            .await?;
        Self::parse_data(response).await
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .execute(self.http.patch(self.url(path)).json(body))
            .await?;
        Self::parse_data(response).await
    }

    /// Make a DELETE request. Tolerates empty (204) response bodies.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.execute(self.http.delete(self.url(path))).await?;
        Ok(())
    }

    /// Send a request, handling authentication and retries.
    ///
    /// A 401 triggers one forced token refresh followed by a single retry;
    /// a second 401 surfaces as [`Error::TokenExpired`]. Transient statuses
    /// and connect/timeout errors are retried per [`RetryConfig`] with
    /// exponential backoff. Returns the response once it has a non-retryable
    /// status; non-2xx statuses are mapped to errors.
    async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let mut refreshed = false;
        let mut attempt: u32 = 0;

        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| Error::InvalidInput("request body is not cloneable".into()))?;
            let headers = self.build_headers().await?;

            let response = match request.headers(headers).send().await {
                Ok(response) => response,
                Err(e) => {
                    let transient = e.is_timeout() || e.is_connect();
                    if transient && attempt < self.config.retry.max_retries {
                        let backoff = self.config.retry.backoff_for_attempt(attempt);
                        attempt += 1;
                        tracing::debug!(attempt, ?backoff, "transport error, retrying");
                        tokio::time::sleep(backoff).await;
                        continue;
                    }
                    return Err(e.into());
                }
            };

            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                if !refreshed {
                    refreshed = true;
                    tracing::debug!("received 401, refreshing access token and retrying once");
                    self.auth.refresh().await?;
                    continue;
                }
                return Err(Error::TokenExpired);
            }

            if self.config.retry.should_retry_status(status.as_u16())
                && attempt < self.config.retry.max_retries
            {
                let backoff = self.config.retry.backoff_for_attempt(attempt);
                attempt += 1;
                tracing::debug!(status = status.as_u16(), attempt, ?backoff, "retrying");
                tokio::time::sleep(backoff).await;
                continue;
            }

            if status.is_success() {
                return Ok(response);
            }

            return Err(Self::error_for_response(response).await);
        }
    }

    /// Unwrap the `data` field from the response envelope.
    async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let envelope: ApiResponse<T> = response.json().await?;
        Ok(envelope.data)
    }

    /// Map a non-success response to an error.
    async fn error_for_response(response: reqwest::Response) -> Error {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);
            return Error::RateLimited { retry_after_secs };
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();

        if status == StatusCode::NOT_FOUND {
            let message = body
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("Resource not found")
                .to_string();
            return Error::NotFound(message);
        }

        Error::from_api_response(status.as_u16(), body)
    }
}

/// Wrapper for API response envelopes.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<PageMeta>,
    #[allow(dead_code)]
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Pagination metadata from list responses.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PageMeta {
    /// Cursor to pass as `cursor` for the next page; absent on the last page
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// Number of items in this page
    #[serde(default)]
    pub count: Option<u32>,
}
