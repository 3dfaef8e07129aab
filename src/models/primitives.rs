//! Primitive types and newtypes for type-safe API interactions.
//!
//! Strongly-typed wrappers around string identifiers prevent mixing up
//! different kinds of resource IDs at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$docs:meta])* $name:ident) => {
        $(#[$docs])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

id_type! {
    /// A strongly-typed bank account identifier.
    ///
    /// # Example
    ///
    /// ```
    /// use meridian_rs::AccountId;
    ///
    /// let account = AccountId::new("acc_9f2b71");
    /// assert_eq!(account.as_str(), "acc_9f2b71");
    /// ```
    AccountId
}

id_type! {
    /// A strongly-typed transaction identifier.
    TransactionId
}

id_type! {
    /// A strongly-typed payment identifier.
    PaymentId
}

id_type! {
    /// A strongly-typed payee (counterparty) identifier.
    PayeeId
}

id_type! {
    /// A strongly-typed webhook endpoint identifier.
    WebhookEndpointId
}

/// API version in `YYYY-MM-DD` format.
///
/// Meridian supports date-based API versioning via the `Meridian-Version`
/// request header. This type ensures only valid version strings are used.
///
/// # Example
///
/// ```
/// use meridian_rs::ApiVersion;
///
/// let version = ApiVersion::new("2024-06-01").expect("valid version");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// Create a new API version, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the version is not a valid `YYYY-MM-DD` date.
    pub fn new(version: &str) -> crate::Result<Self> {
        if chrono::NaiveDate::parse_from_str(version, "%Y-%m-%d").is_err() {
            return Err(crate::Error::InvalidInput(format!(
                "Invalid API version: {}. Expected YYYY-MM-DD",
                version
            )));
        }
        Ok(ApiVersion(version.to_string()))
    }

    /// Get the version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Environment configuration for the Meridian API.
///
/// Determines which set of base URLs the client talks to.
///
/// # Example
///
/// ```
/// use meridian_rs::Environment;
///
/// let env = Environment::Sandbox;
/// println!("API URL: {}", env.api_base_url());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Production environment - live accounts and real money movement.
    #[default]
    Production,
    /// Sandbox environment with simulated institutions and test data.
    Sandbox,
}

impl Environment {
    /// Get the base URL for REST API requests.
    pub fn api_base_url(&self) -> &'static str {
        match self {
            Environment::Production => "https://api.meridianbank.io",
            Environment::Sandbox => "https://api.sandbox.meridianbank.io",
        }
    }

    /// Returns `true` if this is the production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Returns `true` if this is the sandbox environment.
    pub fn is_sandbox(&self) -> bool {
        matches!(self, Environment::Sandbox)
    }
}

impl std::str::FromStr for Environment {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "production" | "prod" | "live" => Ok(Environment::Production),
            "sandbox" | "test" => Ok(Environment::Sandbox),
            other => Err(crate::Error::Config(format!(
                "Unknown environment: {}. Expected 'production' or 'sandbox'",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Sandbox => write!(f, "sandbox"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id() {
        let account = AccountId::new("acc_9f2b71");
        assert_eq!(account.as_str(), "acc_9f2b71");
        assert_eq!(account.to_string(), "acc_9f2b71");
    }

    #[test]
    fn test_id_from_str() {
        let payment: PaymentId = "pay_0001".into();
        assert_eq!(payment.as_str(), "pay_0001");
    }

    #[test]
    fn test_api_version_valid() {
        let version = ApiVersion::new("2024-06-01").unwrap();
        assert_eq!(version.as_str(), "2024-06-01");
    }

    #[test]
    fn test_api_version_invalid() {
        assert!(ApiVersion::new("2024").is_err());
        assert!(ApiVersion::new("2024-13-01").is_err());
        assert!(ApiVersion::new("20240601").is_err());
        assert!(ApiVersion::new("not-a-date").is_err());
    }

    #[test]
    fn test_environment_urls() {
        assert_eq!(
            Environment::Production.api_base_url(),
            "https://api.meridianbank.io"
        );
        assert_eq!(
            Environment::Sandbox.api_base_url(),
            "https://api.sandbox.meridianbank.io"
        );
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "sandbox".parse::<Environment>().unwrap(),
            Environment::Sandbox
        );
        assert_eq!(
            "Production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }
}
