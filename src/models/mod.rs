//! Data models for the Meridian API.
//!
//! All the strongly-typed structures exchanged with the API, organized by
//! domain:
//!
//! - [`primitives`] - Core types like `AccountId`, `Environment`, etc.
//! - [`enums`] - Enumeration types for statuses and kinds
//! - [`account`] - Account and balance models
//! - [`transaction`] - Transaction models
//! - [`payment`] - Payment models and builder
//! - [`payee`] - Payee (counterparty) models
//! - [`webhook`] - Webhook endpoint and event models

pub mod account;
pub mod enums;
pub mod payee;
pub mod payment;
pub mod primitives;
pub mod transaction;
pub mod webhook;

// Re-export commonly used types
pub use account::*;
pub use enums::*;
pub use payee::*;
pub use payment::*;
pub use primitives::*;
pub use transaction::*;
pub use webhook::*;
