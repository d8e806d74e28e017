use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::Validate;

pub type HotelId = i64;

/// Moderation state of a listing. Only `Approved` hotels are publicly visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum HotelStatus {
    Pending,
    Approved,
    Rejected,
    Disabled,
}

impl HotelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HotelStatus::Pending => "pending",
            HotelStatus::Approved => "approved",
            HotelStatus::Rejected => "rejected",
            HotelStatus::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
pub struct Hotel {
    pub id: HotelId,
    pub owner_id: String,
    pub name: String,
    pub country: String,
    pub city: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price_per_night: Option<f64>,
    pub wifi_speed_mbps: Option<i64>,
    pub workspace_in_room: bool,
    pub coworking_on_site: bool,
    pub coworking_nearby: bool,
    pub long_stay_possible: bool,
    pub long_stay_min_nights: Option<i64>,
    pub affiliate_url: Option<String>,
    pub status: HotelStatus,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub amenities: Json<Vec<String>>,
    pub home_office_amenities: Json<Vec<String>>,
    pub created_at: chrono::NaiveDateTime,
}

impl Hotel {
    /// Latitude and longitude, only when both are recorded.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }

    /// Booking link, ignoring blank values left behind by older forms.
    pub fn booking_url(&self) -> Option<&str> {
        self.affiliate_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Owner-submitted listing data, used for both create and update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct HotelInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[serde(default)]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(range(min = 0.0))]
    pub price_per_night: Option<f64>,
    pub wifi_speed_mbps: Option<u32>,
    #[serde(default)]
    pub workspace_in_room: bool,
    #[serde(default)]
    pub coworking_on_site: bool,
    #[serde(default)]
    pub coworking_nearby: bool,
    #[serde(default)]
    pub long_stay_possible: bool,
    pub long_stay_min_nights: Option<u32>,
    #[validate(url)]
    pub affiliate_url: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub home_office_amenities: Vec<String>,
}

impl HotelInput {
    /// Coordinates have to come as a pair, a lone latitude or longitude is rejected.
    pub fn has_partial_coordinates(&self) -> bool {
        self.latitude.is_some() != self.longitude.is_some()
    }

    /// Minimum stay is only stored while long stays are offered.
    pub fn effective_min_nights(&self) -> Option<u32> {
        if self.long_stay_possible {
            self.long_stay_min_nights
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: HotelStatus,
}


#[cfg(test)]
mod tests {
    use super::fixtures::hotel;
    use super::*;

    #[test]
    fn coordinates_need_both_parts() {
        let mut h = hotel(1, "Berlin");
        assert_eq!(h.coordinates(), Some((52.52, 13.405)));
        h.longitude = None;
        assert_eq!(h.coordinates(), None);
    }

    #[test]
    fn blank_booking_url_is_ignored() {
        let mut h = hotel(1, "Berlin");
        h.affiliate_url = Some("   ".to_string());
        assert_eq!(h.booking_url(), None);
        h.affiliate_url = Some("https://example.com/book".to_string());
        assert_eq!(h.booking_url(), Some("https://example.com/book"));
    }

    #[test]
    fn min_nights_dropped_without_long_stay() {
        let input = HotelInput {
            long_stay_min_nights: Some(14),
            ..HotelInput::default()
        };
        assert_eq!(input.effective_min_nights(), None);
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let input = HotelInput {
            name: "Nomad Inn".to_string(),
            country: "Germany".to_string(),
            city: "Berlin".to_string(),
            latitude: Some(123.0),
            longitude: Some(13.4),
            ..HotelInput::default()
        };
        assert!(input.validate().is_err());
    }
}
