use chrono::Utc;
use uuid::Uuid;

/// Published to the booking-events topic after a booking commits.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingCreatedEvent {
    pub event: String,
    pub booking_id: Uuid,
    pub user_id: String,
    pub train_id: Uuid,
    pub total_price: i64,
    pub timestamp: String,
}

impl BookingCreatedEvent {
    pub fn new(booking_id: Uuid, user_id: String, train_id: Uuid, total_price: i64) -> Self {
        Self {
            event: "BOOKING_CREATED".to_string(),
            booking_id,
            user_id,
            train_id,
            total_price,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Published to the waitlist channel when a request cannot be seated.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct WaitlistRequestedEvent {
    pub event: String,
    pub user_id: String,
    pub train_id: Uuid,
    pub travel_date: chrono::NaiveDate,
    pub passengers: u32,
    pub timestamp: String,
}

impl WaitlistRequestedEvent {
    pub fn new(user_id: String, train_id: Uuid, travel_date: chrono::NaiveDate, passengers: u32) -> Self {
        Self {
            event: "WAITLIST_REQUESTED".to_string(),
            user_id,
            train_id,
            travel_date,
            passengers,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Enqueued on the email-notifications queue; drained by the email worker.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct EmailNotificationJob {
    pub event: String,
    pub booking_id: Uuid,
    pub user_id: String,
    pub timestamp: String,
}

impl EmailNotificationJob {
    pub fn new(booking_id: Uuid, user_id: String) -> Self {
        Self {
            event: "BOOKING_CONFIRMATION_EMAIL".to_string(),
            booking_id,
            user_id,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
