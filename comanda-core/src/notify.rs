//! Takeout customer notifications
//!
//! Fire-and-forget side channel: a takeout customer gets one message when the
//! order is submitted and one when the kitchen marks it ready. Delivery
//! failures are logged and never retried — losing a customer text must never
//! block the kitchen or cashier workflow, so dispatch happens outside the
//! transactional boundary, after the status change has committed.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound message boundary ("send text Y to phone X").
///
/// The channel (WhatsApp, SMS) and delivery confirmation live outside the
/// core; implementations just attempt one send.
#[async_trait]
pub trait CustomerNotifier: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> Result<(), NotifyError>;
}

/// Message sent when a takeout order is acknowledged by the kitchen queue
pub fn order_received_message(order_id: &str) -> String {
    format!(
        "Tu orden #{} ha sido recibida y está en preparación.",
        order_id
    )
}

/// Message sent when a takeout order is ready at the counter
pub fn order_ready_message(order_id: &str) -> String {
    format!(
        "Tu orden #{} ya está terminada. Disponible en mostrador.",
        order_id
    )
}

/// Dispatch one message without blocking the caller.
///
/// Spawned onto the runtime; a failed send is logged with the target phone
/// and dropped.
pub fn dispatch(notifier: Arc<dyn CustomerNotifier>, phone: String, message: String) {
    tokio::spawn(async move {
        if let Err(err) = notifier.send(&phone, &message).await {
            tracing::warn!(phone = %phone, error = %err, "Customer notification failed");
        } else {
            tracing::debug!(phone = %phone, "Customer notification sent");
        }
    });
}

/// Notifier that drops every message; for dine-in-only deployments and tests
pub struct NoopNotifier;

#[async_trait]
impl CustomerNotifier for NoopNotifier {
    async fn send(&self, _phone: &str, _message: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_texts_carry_order_id() {
        let received = order_received_message("abc123");
        assert!(received.contains("#abc123"));
        assert!(received.contains("en preparación"));

        let ready = order_ready_message("abc123");
        assert!(ready.contains("#abc123"));
        assert!(ready.contains("mostrador"));
    }
}
