//! Enumeration types for the Meridian API.

use serde::{Deserialize, Serialize};

/// Type of bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Current/checking account
    Checking,
    /// Savings account
    Savings,
    /// Credit card account
    CreditCard,
    /// Loan account
    Loan,
    /// Unknown account type
    #[serde(other)]
    Unknown,
}

/// Lifecycle status of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account is open and usable
    Open,
    /// Account has been closed
    Closed,
    /// Account is temporarily suspended
    Suspended,
}

/// Settlement status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Transaction is authorized but not yet settled
    Pending,
    /// Transaction has settled
    Booked,
    /// Transaction was reversed
    Reversed,
}

/// Direction of money movement relative to the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    /// Money into the account
    Credit,
    /// Money out of the account
    Debit,
}

/// Lifecycle status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment accepted but not yet processed
    Created,
    /// Payment is being processed by the scheme
    Pending,
    /// Payment has been executed
    Executed,
    /// Payment failed
    Failed,
    /// Payment was cancelled before execution
    Cancelled,
}

impl PaymentStatus {
    /// Returns `true` if the payment has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Executed | PaymentStatus::Failed | PaymentStatus::Cancelled
        )
    }
}

/// Status of a webhook endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    /// Endpoint receives deliveries
    Enabled,
    /// Endpoint is registered but deliveries are paused
    Disabled,
}

/// Event types deliverable to a webhook endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// A payment reached the executed state
    PaymentExecuted,
    /// A payment failed
    PaymentFailed,
    /// A new transaction was booked on an account
    TransactionCreated,
    /// Account details or status changed
    AccountUpdated,
    /// Event type added after this crate version was released
    #[serde(other)]
    Unknown,
}
