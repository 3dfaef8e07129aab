//! # meridian-rs
//!
//! A Rust client for the Meridian open banking API.
//!
//! This crate wraps Meridian's OAuth2 + REST interface: it manages the
//! token lifecycle (exchange, refresh, caching), builds authenticated
//! requests, and exposes typed, resource-oriented methods for accounts,
//! transactions, payments, payees, and webhook endpoints.
//!
//! ## Features
//!
//! - **Authentication**: OAuth2 client-credentials and authorization-code
//!   grants with automatic refresh, including one retry after a 401
//! - **Configuration**: explicit overrides, `MERIDIAN_*` environment
//!   variables, and per-environment defaults, merged in that order
//! - **Accounts & Transactions**: balances, history, and lazy cursor
//!   pagination via `Stream`
//! - **Payments & Payees**: validated payment creation and counterparty
//!   management
//! - **Webhooks**: endpoint management and HMAC-SHA256 delivery
//!   verification
//! - **Type Safety**: newtype IDs and `rust_decimal` money amounts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meridian_rs::{MeridianClient, Credentials, Environment};
//!
//! #[tokio::main]
//! async fn main() -> meridian_rs::Result<()> {
//!     let client = MeridianClient::builder()
//!         .credentials(Credentials::client_credentials(
//!             "your-client-id",
//!             "your-client-secret",
//!         ))
//!         .environment(Environment::Sandbox)
//!         .build()?;
//!
//!     let accounts = client.accounts().list().await?;
//!     println!("Found {} accounts", accounts.len());
//!
//!     if let Some(account) = accounts.first() {
//!         let balance = client.accounts().balance(&account.id).await?;
//!         println!("{}: {} {}", account.name, balance.available, balance.currency);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Making a payment
//!
//! ```rust,no_run
//! use meridian_rs::{MeridianClient, AccountId, PayeeId};
//! use meridian_rs::models::NewPaymentBuilder;
//! use rust_decimal_macros::dec;
//!
//! #[tokio::main]
//! async fn main() -> meridian_rs::Result<()> {
//!     let client = MeridianClient::from_env()?;
//!
//!     let payment = NewPaymentBuilder::new()
//!         .account(AccountId::new("acc_9f2b71"))
//!         .payee(PayeeId::new("pye_330c1d"))
//!         .amount(dec!(45.00))
//!         .currency("GBP")
//!         .reference("INV-2024-0917")
//!         .build()?;
//!
//!     let created = client.payments().create(payment).await?;
//!     println!("Payment {} is {:?}", created.id, created.status);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Verifying a webhook delivery
//!
//! ```rust
//! use meridian_rs::webhook;
//!
//! # fn handle(secret: &str, body: &[u8], signature: &str) -> meridian_rs::Result<()> {
//! let event = webhook::parse_event(secret, body, signature)?;
//! println!("{:?}: {}", event.event_type, event.id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod webhook;

// Re-export primary types at crate root for convenience
pub use auth::Credentials;
pub use client::{ClientBuilder, ClientConfig, MeridianClient, RetryConfig};
pub use error::{Error, Result};
pub use models::{
    AccountId, ApiVersion, Environment, PayeeId, PaymentId, TransactionId, WebhookEndpointId,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use meridian_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::Credentials;
    pub use crate::client::{ClientConfig, MeridianClient, RetryConfig};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        AccountId, ApiVersion, Environment, PayeeId, PaymentId, TransactionId, WebhookEndpointId,
        // Enums
        AccountStatus, AccountType, PaymentStatus, TransactionDirection, TransactionStatus,
        WebhookEventType, WebhookStatus,
        // Account models
        Account, AccountIdentifiers, Balance,
        // Transaction models
        Transaction,
        // Payment models
        NewPayment, NewPaymentBuilder, Payment,
        // Payee models
        NewPayee, Payee, PayeeAccountIdentifier, PayeeUpdate,
        // Webhook models
        NewWebhookEndpoint, WebhookEndpoint, WebhookEndpointUpdate, WebhookEvent,
    };
}
