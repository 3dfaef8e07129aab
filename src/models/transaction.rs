//! Transaction models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{TransactionDirection, TransactionStatus};
use super::{AccountId, TransactionId};

/// A single transaction on an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: TransactionId,
    /// Account this transaction belongs to
    pub account_id: AccountId,
    /// Transaction amount; always positive, see `direction`
    pub amount: Decimal,
    /// ISO 4217 currency code
    pub currency: String,
    /// Credit or debit relative to the account
    pub direction: TransactionDirection,
    /// Settlement status
    pub status: TransactionStatus,
    /// Statement description
    pub description: String,
    /// Cleaned merchant name, when the provider could resolve one
    #[serde(default)]
    pub merchant_name: Option<String>,
    /// Payment reference, if present
    #[serde(default)]
    pub reference: Option<String>,
    /// Provider-assigned spending category
    #[serde(default)]
    pub category: Option<String>,
    /// When the transaction was booked
    pub booked_at: DateTime<Utc>,
    /// When the transaction settled, if it has
    #[serde(default)]
    pub settled_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Signed amount: negative for debits, positive for credits.
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            TransactionDirection::Credit => self.amount,
            TransactionDirection::Debit => -self.amount,
        }
    }
}
