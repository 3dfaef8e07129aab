//! Payee (counterparty) models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PayeeId;

/// A saved counterparty that payments can be sent to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payee {
    /// Unique payee identifier
    pub id: PayeeId,
    /// Display name of the payee
    pub name: String,
    /// Account details used to route payments
    pub account_identifier: PayeeAccountIdentifier,
    /// When the payee was created
    pub created_at: DateTime<Utc>,
}

/// Scheme identifier for a payee's account.
///
/// Exactly one routing form is expected: `iban` for SEPA payees, or
/// `sort_code` plus `account_number` for UK payees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayeeAccountIdentifier {
    /// International Bank Account Number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    /// Domestic account number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    /// UK sort code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_code: Option<String>,
}

impl PayeeAccountIdentifier {
    /// Identifier routed by IBAN.
    pub fn iban(iban: impl Into<String>) -> Self {
        Self {
            iban: Some(iban.into()),
            account_number: None,
            sort_code: None,
        }
    }

    /// Identifier routed by UK sort code and account number.
    pub fn sort_code_account_number(
        sort_code: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        Self {
            iban: None,
            account_number: Some(account_number.into()),
            sort_code: Some(sort_code.into()),
        }
    }
}

/// Request body for creating a payee.
#[derive(Debug, Clone, Serialize)]
pub struct NewPayee {
    /// Display name of the payee
    pub name: String,
    /// Account details used to route payments
    pub account_identifier: PayeeAccountIdentifier,
}

/// Partial update for a payee, applied with PATCH semantics.
///
/// Only the fields set to `Some` are sent; omitted fields are left
/// unchanged server-side.
#[derive(Debug, Default, Clone, Serialize)]
pub struct PayeeUpdate {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
