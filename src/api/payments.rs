//! Payments service for initiating and tracking payments.

use std::sync::Arc;

use serde::Serialize;

use crate::client::ClientInner;
use crate::models::{NewPayment, Payment, PaymentId, PaymentStatus};
use crate::Result;

/// Service for payment operations.
///
/// # Example
///
/// ```no_run
/// use meridian_rs::models::{NewPaymentBuilder, AccountId, PayeeId};
/// use rust_decimal_macros::dec;
///
/// # async fn example(client: meridian_rs::MeridianClient) -> meridian_rs::Result<()> {
/// let payment = NewPaymentBuilder::new()
///     .account(AccountId::new("acc_9f2b71"))
///     .payee(PayeeId::new("pye_330c1d"))
///     .amount(dec!(45.00))
///     .currency("GBP")
///     .reference("INV-2024-0917")
///     .build()?;
///
/// let created = client.payments().create(payment).await?;
/// println!("Payment {} is {:?}", created.id, created.status);
/// # Ok(())
/// # }
/// ```
pub struct PaymentsService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing payments.
#[derive(Debug, Default, Clone, Serialize)]
pub struct PaymentsQuery {
    /// Filter by lifecycle status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    /// Filter by funding account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Results per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor from a previous page's metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl PaymentsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Initiate a payment.
    pub async fn create(&self, payment: NewPayment) -> Result<Payment> {
        self.inner.post("/payments", &payment).await
    }

    /// Get a payment by ID.
    pub async fn get(&self, payment_id: &PaymentId) -> Result<Payment> {
        self.inner.get(&format!("/payments/{}", payment_id)).await
    }

    /// List payments.
    pub async fn list(&self, query: Option<PaymentsQuery>) -> Result<Vec<Payment>> {
        match query {
            Some(q) => self.inner.get_with_query("/payments", &q).await,
            None => self.inner.get("/payments").await,
        }
    }

    /// Cancel a payment that has not yet been executed.
    ///
    /// The API rejects cancellation of payments in a terminal state with a
    /// 409; that surfaces here as [`crate::Error::Api`].
    pub async fn cancel(&self, payment_id: &PaymentId) -> Result<()> {
        self.inner.delete(&format!("/payments/{}", payment_id)).await
    }
}
