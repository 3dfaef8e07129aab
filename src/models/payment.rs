//! Payment models and the validated payment builder.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::PaymentStatus;
use super::{AccountId, PayeeId, PaymentId};

/// A payment initiated through the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique payment identifier
    pub id: PaymentId,
    /// Account the payment is funded from
    pub account_id: AccountId,
    /// Payee receiving the funds
    pub payee_id: PayeeId,
    /// Payment amount
    pub amount: Decimal,
    /// ISO 4217 currency code
    pub currency: String,
    /// Reference shown on both statements
    pub reference: String,
    /// Lifecycle status
    pub status: PaymentStatus,
    /// When the payment was created
    pub created_at: DateTime<Utc>,
    /// When the payment was executed, if it has been
    #[serde(default)]
    pub executed_at: Option<DateTime<Utc>>,
    /// Failure reason for failed payments
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// Request body for creating a payment.
///
/// Use [`NewPaymentBuilder`] to construct one with validation.
///
/// # Example
///
/// ```
/// use meridian_rs::models::{NewPaymentBuilder, AccountId, PayeeId};
/// use rust_decimal_macros::dec;
///
/// let payment = NewPaymentBuilder::new()
///     .account(AccountId::new("acc_9f2b71"))
///     .payee(PayeeId::new("pye_330c1d"))
///     .amount(dec!(45.00))
///     .currency("GBP")
///     .reference("INV-2024-0917")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    /// Account the payment is funded from
    pub account_id: AccountId,
    /// Payee receiving the funds
    pub payee_id: PayeeId,
    /// Payment amount; must be positive
    pub amount: Decimal,
    /// ISO 4217 currency code
    pub currency: String,
    /// Reference shown on both statements
    pub reference: String,
}

/// Builder for creating new payments with validation.
#[derive(Debug, Default, Clone)]
pub struct NewPaymentBuilder {
    account_id: Option<AccountId>,
    payee_id: Option<PayeeId>,
    amount: Option<Decimal>,
    currency: Option<String>,
    reference: Option<String>,
}

impl NewPaymentBuilder {
    /// Create a new payment builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the funding account.
    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Set the payee.
    pub fn payee(mut self, payee_id: PayeeId) -> Self {
        self.payee_id = Some(payee_id);
        self
    }

    /// Set the payment amount.
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the currency code.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the payment reference.
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Build the payment request.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if a required field is missing
    /// or the amount is not positive.
    pub fn build(self) -> crate::Result<NewPayment> {
        let account_id = self
            .account_id
            .ok_or_else(|| crate::Error::InvalidInput("payment requires an account".into()))?;
        let payee_id = self
            .payee_id
            .ok_or_else(|| crate::Error::InvalidInput("payment requires a payee".into()))?;
        let amount = self
            .amount
            .ok_or_else(|| crate::Error::InvalidInput("payment requires an amount".into()))?;
        if amount <= Decimal::ZERO {
            return Err(crate::Error::InvalidInput(
                "payment amount must be positive".into(),
            ));
        }
        let currency = self
            .currency
            .ok_or_else(|| crate::Error::InvalidInput("payment requires a currency".into()))?;
        let reference = self
            .reference
            .ok_or_else(|| crate::Error::InvalidInput("payment requires a reference".into()))?;

        Ok(NewPayment {
            account_id,
            payee_id,
            amount,
            currency,
            reference,
        })
    }
}
