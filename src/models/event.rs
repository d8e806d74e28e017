use serde::{Deserialize, Serialize};

use super::hotel::HotelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EventType {
    View,
    AffiliateClick,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::View => "view",
            EventType::AffiliateClick => "affiliate_click",
        }
    }
}

/// Row in the append-only `hotel_events` collection.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HotelEvent {
    pub id: i64,
    pub hotel_id: HotelId,
    pub event_type: EventType,
    pub created_at: chrono::NaiveDateTime,
}

/// Event waiting to be written. Timestamped when the interaction happens,
/// not when the write finally succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHotelEvent {
    pub hotel_id: HotelId,
    pub event_type: EventType,
    pub created_at: chrono::NaiveDateTime,
}

impl NewHotelEvent {
    pub fn now(hotel_id: HotelId, event_type: EventType) -> Self {
        Self {
            hotel_id,
            event_type,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
