//! Webhook delivery verification.
//!
//! Meridian signs every webhook delivery with HMAC-SHA256 over the raw
//! request body, using the endpoint's signing secret. The hex-encoded
//! digest is sent in the `Meridian-Signature` header, optionally prefixed
//! with `sha256=`.
//!
//! # Example
//!
//! ```
//! use meridian_rs::webhook;
//!
//! let secret = "whsec_test";
//! let payload = br#"{"id":"evt_1","event_type":"payment_executed","created_at":"2024-06-12T08:00:00Z","data":{}}"#;
//! let signature = webhook::sign(secret, payload);
//!
//! let event = webhook::parse_event(secret, payload, &signature).unwrap();
//! assert_eq!(event.id, "evt_1");
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::models::WebhookEvent;
use crate::{Error, Result};

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "Meridian-Signature";

type HmacSha256 = Hmac<Sha256>;

/// Verify a webhook delivery signature.
///
/// `payload` must be the raw request body, byte-for-byte; re-serializing
/// parsed JSON will not produce the signed bytes. The comparison is
/// constant-time.
///
/// # Errors
///
/// Returns [`Error::WebhookSignature`] if the signature is malformed or
/// does not match the payload.
pub fn verify_signature(secret: &str, payload: &[u8], signature: &str) -> Result<()> {
    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);
    let digest = hex::decode(signature)
        .map_err(|_| Error::WebhookSignature("signature is not valid hex".into()))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| Error::WebhookSignature("invalid signing secret".into()))?;
    mac.update(payload);
    mac.verify_slice(&digest)
        .map_err(|_| Error::WebhookSignature("signature mismatch".into()))
}

/// Compute the signature for a payload.
///
/// Useful for constructing test deliveries; the API computes this
/// server-side for real deliveries.
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a delivery and parse its event envelope.
pub fn parse_event(secret: &str, payload: &[u8], signature: &str) -> Result<WebhookEvent> {
    verify_signature(secret, payload, signature)?;
    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WebhookEventType;

    const SECRET: &str = "whsec_4f1c2a";
    const PAYLOAD: &[u8] = br#"{"id":"evt_77aa01","event_type":"payment_executed","created_at":"2024-06-12T08:00:00Z","data":{"payment_id":"pay_0001"}}"#;

    #[test]
    fn test_verify_accepts_valid_signature() {
        let signature = sign(SECRET, PAYLOAD);
        assert!(verify_signature(SECRET, PAYLOAD, &signature).is_ok());
    }

    #[test]
    fn test_verify_accepts_prefixed_signature() {
        let signature = format!("sha256={}", sign(SECRET, PAYLOAD));
        assert!(verify_signature(SECRET, PAYLOAD, &signature).is_ok());
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let signature = sign(SECRET, PAYLOAD);
        let mut tampered = PAYLOAD.to_vec();
        tampered[2] ^= 1;
        assert!(verify_signature(SECRET, &tampered, &signature).is_err());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let signature = sign(SECRET, PAYLOAD);
        assert!(verify_signature("whsec_other", PAYLOAD, &signature).is_err());
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        let err = verify_signature(SECRET, PAYLOAD, "not-hex").unwrap_err();
        assert!(matches!(err, Error::WebhookSignature(_)));
    }

    #[test]
    fn test_parse_event_roundtrip() {
        let signature = sign(SECRET, PAYLOAD);
        let event = parse_event(SECRET, PAYLOAD, &signature).unwrap();
        assert_eq!(event.id, "evt_77aa01");
        assert_eq!(event.event_type, WebhookEventType::PaymentExecuted);
        assert_eq!(event.data["payment_id"], "pay_0001");
    }

    #[test]
    fn test_parse_event_refuses_unverified_payload() {
        let result = parse_event("whsec_other", PAYLOAD, &sign(SECRET, PAYLOAD));
        assert!(result.is_err());
    }
}
