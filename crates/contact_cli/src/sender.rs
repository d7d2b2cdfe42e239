//! Delivery back-ends for the terminal front-end.

use std::time::Duration;

use contact_form::{DeliveryError, NotificationSender, OutboundPayload};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::EmailJsConfig;

/// Sends the payload through the EmailJS REST endpoint.
pub struct EmailJsSender {
    client: reqwest::Client,
    config: EmailJsConfig,
}

impl EmailJsSender {
    pub fn new(config: EmailJsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

/// Request body expected by `POST /api/v1.0/email/send`.
pub fn request_body(config: &EmailJsConfig, payload: &OutboundPayload) -> Value {
    json!({
        "service_id": config.service_id,
        "template_id": config.template_id,
        "user_id": config.public_key,
        "template_params": {
            "from_name": payload.sender_name,
            "from_email": payload.sender_email,
            "phone": payload.phone,
            "subject": payload.subject,
            "message": payload.message,
            "to_name": payload.recipient_label,
        }
    })
}

impl NotificationSender for EmailJsSender {
    fn send(&self, payload: OutboundPayload) -> BoxFuture<'_, Result<(), DeliveryError>> {
        async move {
            let body = request_body(&self.config, &payload);
            debug!(endpoint = %self.config.endpoint, "posting contact message");

            let response = self
                .client
                .post(&self.config.endpoint)
                .json(&body)
                .send()
                .await
                .map_err(|e| DeliveryError::new(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                warn!(%status, body = %text, "email service rejected the message");
                return Err(DeliveryError::new(format!("{status}: {text}")));
            }

            Ok(())
        }
        .boxed()
    }
}

/// `--dry-run` sender: logs and prints the payload, never fails.
pub struct LogSender;

impl NotificationSender for LogSender {
    fn send(&self, payload: OutboundPayload) -> BoxFuture<'_, Result<(), DeliveryError>> {
        async move {
            info!(?payload, "dry run, message not delivered");
            match serde_json::to_string_pretty(&payload) {
                Ok(text) => println!("{text}"),
                Err(e) => warn!("payload not printable: {e}"),
            }
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> EmailJsConfig {
        EmailJsConfig {
            service_id: "service_x".into(),
            template_id: "template_y".into(),
            public_key: "pk_123".into(),
            endpoint: "http://127.0.0.1:9/send".into(),
            timeout_secs: 1,
        }
    }

    fn payload() -> OutboundPayload {
        OutboundPayload {
            sender_name: "John Silva".into(),
            sender_email: "john@example.com".into(),
            phone: "Not provided".into(),
            subject: "Quote".into(),
            message: "Hello there, testing.".into(),
            recipient_label: "Astreus".into(),
        }
    }

    #[test]
    fn body_maps_payload_to_template_params() {
        let body = request_body(&config(), &payload());
        assert_eq!(body["user_id"], "pk_123");
        assert_eq!(body["service_id"], "service_x");
        assert_eq!(
            body["template_params"],
            json!({
                "from_name": "John Silva",
                "from_email": "john@example.com",
                "phone": "Not provided",
                "subject": "Quote",
                "message": "Hello there, testing.",
                "to_name": "Astreus",
            })
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_delivery_error() {
        let sender = EmailJsSender::new(config()).unwrap();
        assert!(sender.send(payload()).await.is_err());
    }

    #[tokio::test]
    async fn dry_run_always_succeeds() {
        assert_eq!(LogSender.send(payload()).await, Ok(()));
    }
}
