//! Accounts service for account and balance reads.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{Account, AccountId, Balance};
use crate::Result;

/// Service for account-related operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: meridian_rs::MeridianClient) -> meridian_rs::Result<()> {
/// let accounts = client.accounts().list().await?;
/// for account in accounts {
///     let balance = client.accounts().balance(&account.id).await?;
///     println!("{}: {} {}", account.name, balance.available, balance.currency);
/// }
/// # Ok(())
/// # }
/// ```
pub struct AccountsService {
    inner: Arc<ClientInner>,
}

impl AccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List all accounts visible to the authenticated client.
    pub async fn list(&self) -> Result<Vec<Account>> {
        self.inner.get("/accounts").await
    }

    /// Get details for a specific account.
    pub async fn get(&self, account_id: &AccountId) -> Result<Account> {
        self.inner.get(&format!("/accounts/{}", account_id)).await
    }

    /// Get the current balance for an account.
    pub async fn balance(&self, account_id: &AccountId) -> Result<Balance> {
        self.inner
            .get(&format!("/accounts/{}/balance", account_id))
            .await
    }
}
