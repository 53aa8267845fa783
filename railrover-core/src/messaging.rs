use async_trait::async_trait;
use serde::Serialize;

/// Topic for committed-booking events.
pub const BOOKING_EVENTS_CHANNEL: &str = "booking-events";
/// Channel for capacity-overflow waitlist requests.
pub const WAITLIST_CHANNEL: &str = "waitlist-requests";
/// Durable queue drained by the email worker.
pub const EMAIL_QUEUE: &str = "email-notifications";

#[derive(Debug, thiserror::Error)]
#[error("Publish failed: {0}")]
pub struct PublishError(pub String);

/// Fire-and-forget broker publish. Callers treat failure as non-critical.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), PublishError>;
}

/// Durable job enqueue. The enqueue call itself may fail and is treated as
/// non-critical; the queue provides at-least-once delivery once accepted.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue(&self, queue: &str, job: &str) -> Result<(), PublishError>;
}

/// Informational record of one side-effect attempt. Never influences the
/// critical result returned to the caller.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum NotificationOutcome {
    Published { channel: String },
    Enqueued { queue: String },
    Failed { channel: String, reason: String },
}
