//! Aggregates over the tracked events. Tracking itself never counts anything;
//! everything here is derived from the raw event collection.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::event::{EventType, HotelEvent};
use crate::models::hotel::HotelId;

pub const DEFAULT_WINDOW_DAYS: i64 = 30;
pub const UNKNOWN_HOTEL: &str = "(unknown hotel)";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub views: u64,
    pub clicks: u64,
}

impl EventCounts {
    pub fn add(&mut self, event_type: EventType, count: u64) {
        match event_type {
            EventType::View => self.views += count,
            EventType::AffiliateClick => self.clicks += count,
        }
    }

    /// Clicks per hundred views, 0 without views.
    pub fn click_through_rate(&self) -> f64 {
        if self.views == 0 {
            0.0
        } else {
            self.clicks as f64 / self.views as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct HotelMeta {
    pub id: HotelId,
    pub name: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelStats {
    pub hotel_id: HotelId,
    pub name: String,
    pub city: String,
    pub country: String,
    pub views: u64,
    pub clicks: u64,
    pub click_through_rate: f64,
}

/// Per-hotel totals, most clicked first, then most viewed, then by id.
pub fn summarize(events: &[HotelEvent], meta: &HashMap<HotelId, HotelMeta>) -> Vec<HotelStats> {
    let mut counts: BTreeMap<HotelId, EventCounts> = BTreeMap::new();
    for event in events {
        counts.entry(event.hotel_id).or_default().add(event.event_type, 1);
    }

    let mut rows: Vec<HotelStats> = counts
        .into_iter()
        .map(|(hotel_id, counts)| {
            let (name, city, country) = match meta.get(&hotel_id) {
                Some(m) => (m.name.clone(), m.city.clone(), m.country.clone()),
                None => (UNKNOWN_HOTEL.to_string(), String::new(), String::new()),
            };
            HotelStats {
                hotel_id,
                name,
                city,
                country,
                views: counts.views,
                clicks: counts.clicks,
                click_through_rate: counts.click_through_rate(),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.clicks
            .cmp(&a.clicks)
            .then(b.views.cmp(&a.views))
            .then(a.hotel_id.cmp(&b.hotel_id))
    });
    rows
}

/// Distinct hotel ids referenced by `events`, ascending.
pub fn hotel_ids(events: &[HotelEvent]) -> Vec<HotelId> {
    let mut ids: Vec<HotelId> = events.iter().map(|e| e.hotel_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: i64, hotel_id: HotelId, event_type: EventType) -> HotelEvent {
        HotelEvent {
            id,
            hotel_id,
            event_type,
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|d| d.and_hms_opt(9, 0, 0))
                .unwrap(),
        }
    }

    #[test]
    fn ranks_by_clicks_then_views() {
        use EventType::{AffiliateClick as Click, View};
        let events = vec![
            event(1, 10, View),
            event(2, 10, View),
            event(3, 10, Click),
            event(4, 20, View),
            event(5, 20, Click),
            event(6, 30, View),
            event(7, 30, View),
            event(8, 30, View),
        ];
        let meta = HashMap::from([(
            10,
            HotelMeta {
                id: 10,
                name: "Nomad Inn".to_string(),
                city: "Berlin".to_string(),
                country: "Germany".to_string(),
            },
        )]);

        let rows = summarize(&events, &meta);
        assert_eq!(
            rows.iter().map(|r| r.hotel_id).collect::<Vec<_>>(),
            vec![10, 20, 30]
        );
        assert_eq!(rows[0].name, "Nomad Inn");
        assert_eq!(rows[0].click_through_rate, 50.0);
        assert_eq!(rows[1].name, UNKNOWN_HOTEL);
        assert_eq!(rows[1].click_through_rate, 100.0);
        assert_eq!(rows[2].click_through_rate, 0.0);
    }

    #[test]
    fn clicks_without_views_have_zero_rate() {
        let mut counts = EventCounts::default();
        counts.add(EventType::AffiliateClick, 3);
        assert_eq!(counts.click_through_rate(), 0.0);
    }

    #[test]
    fn ids_are_distinct_and_sorted() {
        let events = vec![
            event(1, 5, EventType::View),
            event(2, 2, EventType::View),
            event(3, 5, EventType::AffiliateClick),
        ];
        assert_eq!(hotel_ids(&events), vec![2, 5]);
    }
}
