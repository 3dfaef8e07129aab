//! Client configuration options.

use std::time::Duration;

use crate::{ApiVersion, Environment};

/// Environment variable selecting sandbox or production.
pub(crate) const ENV_ENVIRONMENT: &str = "MERIDIAN_ENVIRONMENT";
/// Environment variable overriding the resolved base URL.
pub(crate) const ENV_BASE_URL: &str = "MERIDIAN_BASE_URL";
/// Environment variable overriding the request timeout, in seconds.
pub(crate) const ENV_TIMEOUT_SECS: &str = "MERIDIAN_TIMEOUT_SECS";
/// Environment variable pinning the API version.
pub(crate) const ENV_API_VERSION: &str = "MERIDIAN_API_VERSION";

/// Resolved configuration for the Meridian client.
///
/// Usually produced by [`crate::ClientBuilder`], which merges explicit
/// overrides, `MERIDIAN_*` environment variables, and per-environment
/// defaults, in that order of precedence.
///
/// # Example
///
/// ```
/// use meridian_rs::{ClientConfig, Environment};
/// use std::time::Duration;
///
/// let config = ClientConfig::for_environment(Environment::Sandbox)
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Which environment this configuration targets
    pub environment: Environment,
    /// Resolved base URL for API requests
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Retry configuration for transient failures
    pub retry: RetryConfig,
    /// Optional API version to pin to
    pub api_version: Option<ApiVersion>,
    /// Buffer time (in seconds) before token expiry to refresh proactively
    pub token_refresh_buffer_secs: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl ClientConfig {
    /// Create a configuration with the defaults for an environment.
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            base_url: environment.api_base_url().to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("meridian-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
            api_version: None,
            token_refresh_buffer_secs: 60,
        }
    }

    /// Override the base URL. Primarily useful for pointing the client at
    /// a local stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Pin to a specific API version.
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Set the buffer time before token expiry to refresh.
    pub fn with_token_refresh_buffer(mut self, secs: i64) -> Self {
        self.token_refresh_buffer_secs = secs;
        self
    }

    /// The OAuth2 token endpoint for this configuration.
    pub(crate) fn token_url(&self) -> String {
        format!("{}/oauth2/token", self.base_url)
    }
}

/// Configuration for automatic retries of transient failures.
///
/// Applies to 429 and 5xx responses and to connect/timeout transport
/// errors, with exponential backoff. A 401 is not governed by this policy:
/// it triggers a single token refresh and one retry.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// HTTP status codes to retry on
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            retry_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the initial backoff duration.
    pub fn with_initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    /// Set the maximum backoff duration.
    pub fn with_max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Calculate the backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_millis = self.initial_backoff.as_millis() as u64 * 2u64.pow(attempt);
        let max_millis = self.max_backoff.as_millis() as u64;
        Duration::from_millis(backoff_millis.min(max_millis))
    }

    /// Check if a status code should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}
