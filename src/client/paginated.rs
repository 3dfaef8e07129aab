//! Paginated stream for lazy iteration over cursor-paginated endpoints.
//!
//! Meridian list endpoints return at most one page per call plus a
//! `meta.next_cursor` token. [`PaginatedStream`] implements the `Stream`
//! trait and follows cursors lazily, so large result sets can be consumed
//! without buffering every page.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use serde::de::DeserializeOwned;

use super::http::ApiResponse;
use super::ClientInner;
use crate::Result;

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Type alias for a boxed future used internally.
type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

type PageFuture<T> = BoxFuture<'static, Result<ApiResponse<Vec<T>>>>;

/// A stream that lazily fetches pages from a cursor-paginated endpoint.
///
/// Yields individual items, fetching the next page when the current one is
/// exhausted.
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
///     let transaction = result?;
///     println!("{}: {}", transaction.id, transaction.signed_amount());
/// }
/// # Ok(())
/// # }
/// ```
pub struct PaginatedStream<T> {
    /// Function to fetch a page by cursor; `None` fetches the first page.
    fetch_page: Box<dyn Fn(Option<String>) -> PageFuture<T> + Send + Sync>,
    /// Current page of items being yielded.
    current_items: std::vec::IntoIter<T>,
    /// Cursor for the next fetch: `Some(None)` means first page, `None`
    /// means exhausted.
    next_cursor: Option<Option<String>>,
    /// Current in-flight fetch future.
    pending_fetch: Option<PageFuture<T>>,
}

impl<T> PaginatedStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Create a new paginated stream from a page-fetching closure.
    pub(crate) fn new<F>(fetch_page: F) -> Self
    where
        F: Fn(Option<String>) -> PageFuture<T> + Send + Sync + 'static,
    {
        Self {
            fetch_page: Box::new(fetch_page),
            current_items: Vec::new().into_iter(),
            next_cursor: Some(None),
            pending_fetch: None,
        }
    }
}

impl<T> Stream for PaginatedStream<T>
where
    T: Unpin,
{
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if let Some(item) = this.current_items.next() {
                return Poll::Ready(Some(Ok(item)));
            }

            // Current page exhausted; poll the in-flight fetch if any.
            if let Some(ref mut fut) = this.pending_fetch {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(envelope)) => {
                        this.pending_fetch = None;

                        let next_cursor =
                            envelope.meta.as_ref().and_then(|m| m.next_cursor.clone());
                        this.next_cursor = next_cursor.map(Some);
                        this.current_items = envelope.data.into_iter();

                        if this.current_items.len() > 0 {
                            continue;
                        }
                        // An empty page with no cursor ends the stream; an
                        // empty page with a cursor loops to the next fetch.
                        if this.next_cursor.is_none() {
                            return Poll::Ready(None);
                        }
                        continue;
                    }
                    Poll::Ready(Err(e)) => {
                        this.pending_fetch = None;
                        this.next_cursor = None; // Stop on error
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => {
                        return Poll::Pending;
                    }
                }
            }

            // No pending fetch; start one if pages remain.
            if let Some(cursor) = this.next_cursor.take() {
                this.pending_fetch = Some((this.fetch_page)(cursor));
                continue;
            }

            return Poll::Ready(None);
        }
    }
}

impl<T> Unpin for PaginatedStream<T> {}

/// Builder for creating paginated streams over a client endpoint.
pub(crate) struct PaginatedStreamBuilder<T> {
    inner: Arc<ClientInner>,
    path: String,
    page_size: u32,
    _marker: std::marker::PhantomData<T>,
}

impl<T: DeserializeOwned + Unpin + Send + 'static> PaginatedStreamBuilder<T> {
    /// Create a new builder.
    pub(crate) fn new(inner: Arc<ClientInner>, path: impl Into<String>) -> Self {
        Self {
            inner,
            path: path.into(),
            page_size: DEFAULT_PAGE_SIZE,
            _marker: std::marker::PhantomData,
        }
    }

    /// Set the number of items requested per page.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build the stream with optional additional query parameters.
    pub fn build_with_query<Q>(self, query: Option<Q>) -> PaginatedStream<T>
    where
        Q: serde::Serialize + Clone + Send + Sync + 'static,
    {
        let inner = self.inner;
        let path = self.path;
        let page_size = self.page_size;

        PaginatedStream::new(move |cursor: Option<String>| {
            let inner = inner.clone();
            let path = path.clone();
            let query = query.clone();

            Box::pin(async move {
                #[derive(serde::Serialize)]
                struct PageQuery<Q> {
                    limit: u32,
                    #[serde(skip_serializing_if = "Option::is_none")]
                    cursor: Option<String>,
                    #[serde(flatten)]
                    extra: Option<Q>,
                }

                let page_query = PageQuery {
                    limit: page_size,
                    cursor,
                    extra: query,
                };

                inner.get_envelope::<Vec<T>, _>(&path, &page_query).await
            })
        })
    }

    /// Build the stream without additional query parameters.
    #[allow(dead_code)]
    pub fn build(self) -> PaginatedStream<T> {
        self.build_with_query::<()>(None)
    }
}
