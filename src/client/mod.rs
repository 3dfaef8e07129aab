//! HTTP client and service layer for the Meridian API.
//!
//! This module provides the main entry point [`MeridianClient`] along with
//! configuration and pagination support.
//!
//! # Example
//!
//! ```no_run
//! use meridian_rs::MeridianClient;
//!
//! # async fn example() -> meridian_rs::Result<()> {
//! // Credentials and environment from MERIDIAN_* variables
//! let client = MeridianClient::from_env()?;
//!
//! let accounts = client.accounts().list().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;

pub use config::{ClientConfig, RetryConfig};
pub use http::{ClientBuilder, MeridianClient, PageMeta};
pub use paginated::{PaginatedStream, DEFAULT_PAGE_SIZE};
pub(crate) use http::ClientInner;
