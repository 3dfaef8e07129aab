//! Webhooks service for managing delivery endpoints.
//!
//! Verification of incoming deliveries lives in [`crate::webhook`].

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{NewWebhookEndpoint, WebhookEndpoint, WebhookEndpointId, WebhookEndpointUpdate};
use crate::Result;

/// Service for webhook endpoint operations.
///
/// # Example
///
/// ```no_run
/// use meridian_rs::models::{NewWebhookEndpoint, WebhookEventType};
///
/// # async fn example(client: meridian_rs::MeridianClient) -> meridian_rs::Result<()> {
/// let endpoint = client.webhooks().create(NewWebhookEndpoint {
///     url: "https://example.com/meridian/events".to_string(),
///     enabled_events: vec![WebhookEventType::PaymentExecuted],
/// }).await?;
///
/// // The signing secret is only returned on creation; store it now.
/// let secret = endpoint.secret.expect("secret present on create");
/// # Ok(())
/// # }
/// ```
pub struct WebhooksService {
    inner: Arc<ClientInner>,
}

impl WebhooksService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List registered webhook endpoints.
    pub async fn list(&self) -> Result<Vec<WebhookEndpoint>> {
        self.inner.get("/webhook_endpoints").await
    }

    /// Get a webhook endpoint by ID.
    pub async fn get(&self, endpoint_id: &WebhookEndpointId) -> Result<WebhookEndpoint> {
        self.inner
            .get(&format!("/webhook_endpoints/{}", endpoint_id))
            .await
    }

    /// Register a webhook endpoint.
    ///
    /// The response includes the signing secret exactly once.
    pub async fn create(&self, endpoint: NewWebhookEndpoint) -> Result<WebhookEndpoint> {
        self.inner.post("/webhook_endpoints", &endpoint).await
    }

    /// Update a webhook endpoint. Only fields set in the update are changed.
    pub async fn update(
        &self,
        endpoint_id: &WebhookEndpointId,
        update: WebhookEndpointUpdate,
    ) -> Result<WebhookEndpoint> {
        self.inner
            .patch(&format!("/webhook_endpoints/{}", endpoint_id), &update)
            .await
    }

    /// Delete a webhook endpoint.
    pub async fn delete(&self, endpoint_id: &WebhookEndpointId) -> Result<()> {
        self.inner
            .delete(&format!("/webhook_endpoints/{}", endpoint_id))
            .await
    }
}
