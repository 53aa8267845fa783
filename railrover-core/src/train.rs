use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Train {
    pub id: Uuid,
    pub name: String,
    pub number: String,
    pub train_type: String,
    pub total_seats: i32,
    pub amenities: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketClass {
    Economy,
    Business,
    First,
}

impl TicketClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketClass::Economy => "Economy",
            TicketClass::Business => "Business",
            TicketClass::First => "First",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Economy" => Some(TicketClass::Economy),
            "Business" => Some(TicketClass::Business),
            "First" => Some(TicketClass::First),
            _ => None,
        }
    }
}
