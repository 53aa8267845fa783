use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::train::TicketClass;

/// Immutable value record describing one booking attempt. Constructed once
/// at the API boundary and passed by value through the workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub user_id: String,
    pub train_id: Uuid,
    pub route_id: Uuid,
    pub travel_date: NaiveDate,
    pub ticket_class: TicketClass,
    pub passengers: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: String,
    pub train_id: Uuid,
    pub route_id: Uuid,
    pub travel_date: NaiveDate,
    pub ticket_class: TicketClass,
    pub passengers: u32,
    pub total_price: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Persisted bookings are always confirmed. A waitlisted request is a
/// response-only state and never produces a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
        }
    }
}
