//! Payees service for managing counterparties.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{NewPayee, Payee, PayeeId, PayeeUpdate};
use crate::Result;

/// Service for payee (counterparty) operations.
///
/// # Example
///
/// ```no_run
/// use meridian_rs::models::{NewPayee, PayeeAccountIdentifier};
///
/// # async fn example(client: meridian_rs::MeridianClient) -> meridian_rs::Result<()> {
/// let payee = client.payees().create(NewPayee {
///     name: "Landlord".to_string(),
///     account_identifier: PayeeAccountIdentifier::sort_code_account_number(
///         "04-00-04", "12345678",
///     ),
/// }).await?;
/// println!("Created payee {}", payee.id);
/// # Ok(())
/// # }
/// ```
pub struct PayeesService {
    inner: Arc<ClientInner>,
}

impl PayeesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List all payees.
    pub async fn list(&self) -> Result<Vec<Payee>> {
        self.inner.get("/payees").await
    }

    /// Get a payee by ID.
    pub async fn get(&self, payee_id: &PayeeId) -> Result<Payee> {
        self.inner.get(&format!("/payees/{}", payee_id)).await
    }

    /// Create a payee.
    pub async fn create(&self, payee: NewPayee) -> Result<Payee> {
        self.inner.post("/payees", &payee).await
    }

    /// Update a payee. Only fields set in the update are changed.
    pub async fn update(&self, payee_id: &PayeeId, update: PayeeUpdate) -> Result<Payee> {
        self.inner
            .patch(&format!("/payees/{}", payee_id), &update)
            .await
    }

    /// Delete a payee.
    pub async fn delete(&self, payee_id: &PayeeId) -> Result<()> {
        self.inner.delete(&format!("/payees/{}", payee_id)).await
    }
}
