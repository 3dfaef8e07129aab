//! Transactions service for account history.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::paginated::{PaginatedStream, PaginatedStreamBuilder, DEFAULT_PAGE_SIZE};
use crate::client::ClientInner;
use crate::models::{AccountId, Transaction, TransactionId, TransactionStatus};
use crate::Result;

/// Service for transaction history operations.
///
/// # Example
///
/// ```no_run
/// use meridian_rs::AccountId;
///
/// # async fn example(client: meridian_rs::MeridianClient) -> meridian_rs::Result<()> {
/// let account = AccountId::new("acc_9f2b71");
///
/// let transactions = client.transactions().list(&account, None).await?;
/// for txn in transactions {
///     println!("{}: {} {}", txn.booked_at, txn.signed_amount(), txn.description);
/// }
/// # Ok(())
/// # }
/// ```
pub struct TransactionsService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing transactions.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TransactionsQuery {
    /// Filter by settlement status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    /// Only transactions booked at or after this instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    /// Only transactions booked before this instant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
    /// Results per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Cursor from a previous page's metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl TransactionsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List transactions for an account. Returns a single page; use
    /// [`list_stream`](Self::list_stream) to iterate across pages.
    pub async fn list(
        &self,
        account_id: &AccountId,
        query: Option<TransactionsQuery>,
    ) -> Result<Vec<Transaction>> {
        let path = format!("/accounts/{}/transactions", account_id);
        match query {
            Some(q) => self.inner.get_with_query(&path, &q).await,
            None => self.inner.get(&path).await,
        }
    }

    /// Get a specific transaction by ID.
    pub async fn get(
        &self,
        account_id: &AccountId,
        transaction_id: &TransactionId,
    ) -> Result<Transaction> {
        self.inner
            .get(&format!(
                "/accounts/{}/transactions/{}",
                account_id, transaction_id
            ))
            .await
    }

    /// Stream all transactions for an account.
    ///
    /// Pages are fetched lazily as the stream is consumed; the `cursor`
    /// field of the query is ignored since the stream manages cursors
    /// itself.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use futures_util::StreamExt;
    /// use meridian_rs::AccountId;
    ///
    /// # async fn example(client: meridian_rs::MeridianClient) -> meridian_rs::Result<()> {
    /// let account = AccountId::new("acc_9f2b71");
    ///
    /// let mut stream = client.transactions().list_stream(&account, None);
    /// while let Some(result) = stream.next().await {
    ///     let txn = result?;
    ///     println!("{}: {}", txn.id, txn.description);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn list_stream(
        &self,
        account_id: &AccountId,
        query: Option<TransactionsQuery>,
    ) -> PaginatedStream<Transaction> {
        let path = format!("/accounts/{}/transactions", account_id);
        let page_size = query
            .as_ref()
            .and_then(|q| q.limit)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        // The stream owns pagination; strip any caller-supplied paging.
        let query = query.map(|q| TransactionsQuery {
            limit: None,
            cursor: None,
            ..q
        });
        PaginatedStreamBuilder::<Transaction>::new(self.inner.clone(), path)
            .page_size(page_size)
            .build_with_query(query)
    }
}
