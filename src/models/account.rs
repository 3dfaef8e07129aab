//! Account and balance models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{AccountStatus, AccountType};
use super::AccountId;

/// A bank account visible to the authenticated client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier
    pub id: AccountId,
    /// Display name for the account
    pub name: String,
    /// Kind of account (checking, savings, ...)
    pub account_type: AccountType,
    /// ISO 4217 currency code
    pub currency: String,
    /// Lifecycle status
    pub status: AccountStatus,
    /// Scheme identifiers for the account
    #[serde(default)]
    pub identifiers: Option<AccountIdentifiers>,
    /// Name of the institution holding the account
    #[serde(default)]
    pub institution: Option<String>,
    /// When the account record was created
    pub created_at: DateTime<Utc>,
}

/// Scheme-level identifiers for an account.
///
/// Which fields are populated depends on the account's scheme: UK accounts
/// carry a sort code and account number, SEPA accounts an IBAN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountIdentifiers {
    /// International Bank Account Number
    #[serde(default)]
    pub iban: Option<String>,
    /// Domestic account number
    #[serde(default)]
    pub account_number: Option<String>,
    /// UK sort code
    #[serde(default)]
    pub sort_code: Option<String>,
}

/// Point-in-time balance for an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    /// ISO 4217 currency code
    pub currency: String,
    /// Funds available to spend, including any overdraft
    pub available: Decimal,
    /// Settled balance
    pub current: Decimal,
    /// Arranged overdraft limit, if any
    #[serde(default)]
    pub overdraft_limit: Option<Decimal>,
    /// When this balance was last computed
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
