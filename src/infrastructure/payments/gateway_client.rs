use std::collections::HashMap;

use anyhow::Result;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifier for the payment gateway's webhook callbacks. The gateway calls
/// into the webhook endpoint with an HMAC-signed payload.
pub struct GatewayClient {
    webhook_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct GatewayEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub created: Option<i64>,
    pub data: GatewayEventData,
}

#[derive(Debug, Deserialize)]
pub struct GatewayEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: Option<String>,
    pub amount_total: Option<i64>,
    pub payment_ref: Option<String>,
    pub metadata: Option<HashMap<String, String>>,
}

impl GatewayClient {
    pub fn new(webhook_secret: String) -> Self {
        Self { webhook_secret }
    }

    /// Header format: `t=<unix-ts>,v1=<hex hmac of "<ts>.<payload>">`.
    pub fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<GatewayEvent> {
        let mut timestamp: Option<String> = None;
        let mut signature: Option<String> = None;

        for part in signature_header.split(',') {
            if let Some(rest) = part.strip_prefix("t=") {
                timestamp = Some(rest.to_string());
            } else if let Some(rest) = part.strip_prefix("v1=") {
                signature = Some(rest.to_string());
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| anyhow::anyhow!("missing timestamp in signature header"))?;
        let signature =
            signature.ok_or_else(|| anyhow::anyhow!("missing v1 in signature header"))?;

        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.webhook_secret.as_bytes())?;
        mac.update(signed_payload.as_bytes());
        let provided = hex::decode(signature)?;
        mac.verify_slice(&provided)
            .map_err(|_| anyhow::anyhow!("invalid webhook signature"))?;

        let event: GatewayEvent = serde_json::from_slice(payload)?;
        Ok(event)
    }

    pub fn extract_checkout_session(event: &GatewayEvent) -> Option<CheckoutSession> {
        serde_json::from_value(event.data.object.clone()).ok()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_header(secret: &str, timestamp: &str, payload: &[u8]) -> String {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        format!("t={},v1={}", timestamp, signature)
    }

    fn client(secret: &str) -> GatewayClient {
        GatewayClient::new(secret.to_string())
    }

    #[test]
    fn accepts_a_correctly_signed_payload() {
        let payload = br#"{"type":"checkout.completed","data":{"object":{}}}"#;
        let header = signed_header("whsec_test", "1700000000", payload);

        let event = client("whsec_test")
            .verify_webhook_signature(payload, &header)
            .unwrap();

        assert_eq!(event.type_, "checkout.completed");
    }

    #[test]
    fn rejects_a_payload_signed_with_the_wrong_secret() {
        let payload = br#"{"type":"checkout.completed","data":{"object":{}}}"#;
        let header = signed_header("whsec_other", "1700000000", payload);

        assert!(
            client("whsec_test")
                .verify_webhook_signature(payload, &header)
                .is_err()
        );
    }

    #[test]
    fn rejects_a_tampered_payload() {
        let payload = br#"{"type":"checkout.completed","data":{"object":{}}}"#;
        let header = signed_header("whsec_test", "1700000000", payload);
        let tampered = br#"{"type":"checkout.completed","data":{"object":{"amount_total":1}}}"#;

        assert!(
            client("whsec_test")
                .verify_webhook_signature(tampered, &header)
                .is_err()
        );
    }

    #[test]
    fn rejects_a_truncated_signature() {
        let payload = br#"{"type":"checkout.completed","data":{"object":{}}}"#;
        let header = signed_header("whsec_test", "1700000000", payload);
        let truncated = &header[..header.len() - 8];

        assert!(
            client("whsec_test")
                .verify_webhook_signature(payload, truncated)
                .is_err()
        );
    }

    #[test]
    fn rejects_a_header_missing_the_signature_part() {
        let payload = br#"{"type":"checkout.completed","data":{"object":{}}}"#;

        assert!(
            client("whsec_test")
                .verify_webhook_signature(payload, "t=1700000000")
                .is_err()
        );
    }

    #[test]
    fn extracts_checkout_metadata_from_the_event_object() {
        let payload = br#"{
            "type": "checkout.completed",
            "data": {
                "object": {
                    "id": "cs_123",
                    "amount_total": 990,
                    "payment_ref": "pi_123",
                    "metadata": {"user_id": "u", "plan_id": "p"}
                }
            }
        }"#;
        let header = signed_header("whsec_test", "1700000000", payload);

        let event = client("whsec_test")
            .verify_webhook_signature(payload, &header)
            .unwrap();
        let session = GatewayClient::extract_checkout_session(&event).unwrap();

        assert_eq!(session.amount_total, Some(990));
        assert_eq!(session.metadata.unwrap().get("user_id").unwrap(), "u");
    }
}
