//! Webhook endpoint and event models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{WebhookEventType, WebhookStatus};
use super::WebhookEndpointId;

/// A registered webhook endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEndpoint {
    /// Unique endpoint identifier
    pub id: WebhookEndpointId,
    /// Delivery URL
    pub url: String,
    /// Event types delivered to this endpoint
    pub enabled_events: Vec<WebhookEventType>,
    /// Whether deliveries are active
    pub status: WebhookStatus,
    /// Signing secret for [`crate::webhook::verify_signature`].
    ///
    /// Only returned once, in the response to the create call.
    #[serde(default)]
    pub secret: Option<String>,
    /// When the endpoint was registered
    pub created_at: DateTime<Utc>,
}

/// Request body for registering a webhook endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct NewWebhookEndpoint {
    /// Delivery URL; must be HTTPS
    pub url: String,
    /// Event types to deliver
    pub enabled_events: Vec<WebhookEventType>,
}

/// Partial update for a webhook endpoint, applied with PATCH semantics.
#[derive(Debug, Default, Clone, Serialize)]
pub struct WebhookEndpointUpdate {
    /// New delivery URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Replacement set of event types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_events: Option<Vec<WebhookEventType>>,
    /// Enable or disable deliveries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WebhookStatus>,
}

/// Envelope delivered to a webhook endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Unique event identifier
    pub id: String,
    /// What happened
    pub event_type: WebhookEventType,
    /// When the event occurred
    pub created_at: DateTime<Utc>,
    /// Event-type-specific payload
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_envelope_deserializes() {
        let json = serde_json::json!({
            "id": "evt_77aa01",
            "event_type": "payment_executed",
            "created_at": "2024-06-12T08:00:00Z",
            "data": { "payment_id": "pay_0001" }
        });

        let event: WebhookEvent = serde_json::from_value(json).unwrap();
        assert_eq!(event.event_type, WebhookEventType::PaymentExecuted);
        assert_eq!(event.data["payment_id"], "pay_0001");
    }

    #[test]
    fn test_endpoint_update_omits_unset_fields() {
        let update = WebhookEndpointUpdate {
            status: Some(WebhookStatus::Disabled),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            "{\"status\":\"disabled\"}"
        );
    }
}
