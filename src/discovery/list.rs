use serde::Serialize;

use super::map::HotelSummary;
use super::KeyedSet;
use crate::models::hotel::{Hotel, HotelId};

pub const DESCRIPTION_LIMIT: usize = 140;
pub const EMPTY_NOTICE: &str = "No hotels found. Try adjusting the filters.";

/// Handle the page hands back to the session when a row button is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    FocusOnMap { hotel_id: HotelId },
    OpenBooking { hotel_id: HotelId },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    pub hotel_id: HotelId,
    pub summary: HotelSummary,
    pub excerpt: String,
    pub actions: Vec<Action>,
}

impl ListEntry {
    fn of(hotel: &Hotel) -> Self {
        let mut actions = vec![Action::FocusOnMap { hotel_id: hotel.id }];
        if hotel.booking_url().is_some() {
            actions.push(Action::OpenBooking { hotel_id: hotel.id });
        }
        Self {
            hotel_id: hotel.id,
            summary: HotelSummary::of(hotel),
            excerpt: excerpt(hotel.description.as_deref().unwrap_or_default()),
            actions,
        }
    }
}

pub type ListEntries = KeyedSet<ListEntry>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListView {
    Placeholder { message: &'static str },
    Entries { entries: ListEntries },
}

impl ListView {
    pub fn entries(&self) -> Option<&ListEntries> {
        match self {
            ListView::Entries { entries } => Some(entries),
            ListView::Placeholder { .. } => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries().map_or(0, KeyedSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: HotelId) -> bool {
        self.entries().is_some_and(|entries| entries.contains(id))
    }
}

impl Default for ListView {
    fn default() -> Self {
        ListView::Placeholder {
            message: EMPTY_NOTICE,
        }
    }
}

/// One row per hotel, coordinates or not, in result order.
pub fn render_list(hotels: &[Hotel]) -> ListView {
    if hotels.is_empty() {
        return ListView::default();
    }
    ListView::Entries {
        entries: ListEntries::from_keyed(hotels.iter().map(|hotel| (hotel.id, ListEntry::of(hotel)))),
    }
}

fn excerpt(description: &str) -> String {
    let mut chars = description.char_indices();
    match chars.nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}...", &description[..cut]),
        None => description.to_string(),
    }
}
