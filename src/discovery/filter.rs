use serde::{Deserialize, Serialize};

use crate::models::hotel::HotelId;

/// Active search constraints. An unset field never excludes a hotel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    city: Option<String>,
    min_wifi_mbps: Option<u32>,
    workspace_required: bool,
    coworking_on_site: bool,
    coworking_nearby: bool,
    long_stay_required: bool,
    long_stay_max_nights: Option<u32>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when no field constrains the result.
    pub fn is_open(&self) -> bool {
        *self == Self::default()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Blank input clears the city filter.
    pub fn set_city(&mut self, city: &str) {
        let city = city.trim();
        self.city = (!city.is_empty()).then(|| city.to_string());
    }

    pub fn min_wifi_mbps(&self) -> Option<u32> {
        self.min_wifi_mbps
    }

    pub fn set_min_wifi_mbps(&mut self, mbps: Option<u32>) {
        self.min_wifi_mbps = mbps;
    }

    pub fn workspace_required(&self) -> bool {
        self.workspace_required
    }

    pub fn set_workspace_required(&mut self, required: bool) {
        self.workspace_required = required;
    }

    pub fn coworking_on_site(&self) -> bool {
        self.coworking_on_site
    }

    pub fn set_coworking_on_site(&mut self, required: bool) {
        self.coworking_on_site = required;
    }

    pub fn coworking_nearby(&self) -> bool {
        self.coworking_nearby
    }

    pub fn set_coworking_nearby(&mut self, required: bool) {
        self.coworking_nearby = required;
    }

    pub fn long_stay_required(&self) -> bool {
        self.long_stay_required
    }

    pub fn set_long_stay_required(&mut self, required: bool) {
        self.long_stay_required = required;
    }

    /// Stored as given, but only consulted while long stays are required.
    pub fn long_stay_max_nights(&self) -> Option<u32> {
        self.long_stay_max_nights
    }

    pub fn set_long_stay_max_nights(&mut self, nights: Option<u32>) {
        self.long_stay_max_nights = nights;
    }

    /// Replaces every field with the values of a raw form submission.
    pub fn apply_input(&mut self, input: &FilterInput) {
        self.reset();
        self.set_city(input.city.as_deref().unwrap_or_default());
        self.min_wifi_mbps = parse_min_wifi(input.min_wifi.as_deref());
        self.workspace_required = parse_flag(input.workspace.as_deref());
        self.coworking_on_site = parse_flag(input.coworking_on_site.as_deref());
        self.coworking_nearby = parse_flag(input.coworking_nearby.as_deref());
        self.long_stay_required = parse_flag(input.long_stay.as_deref());
        self.long_stay_max_nights =
            parse_count("long_stay_max_nights", input.long_stay_max_nights.as_deref());
    }
}

impl From<&FilterInput> for FilterState {
    fn from(input: &FilterInput) -> Self {
        let mut state = FilterState::new();
        state.apply_input(input);
        state
    }
}

/// Filter form as submitted by the page, every field still raw text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterInput {
    pub city: Option<String>,
    pub min_wifi: Option<String>,
    pub workspace: Option<String>,
    pub coworking_on_site: Option<String>,
    pub coworking_nearby: Option<String>,
    pub long_stay: Option<String>,
    pub long_stay_max_nights: Option<String>,
}

/// `?hotelId=<id>` from the page's initial query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeepLinkParams {
    #[serde(rename = "hotelId")]
    pub hotel_id: Option<String>,
}

impl DeepLinkParams {
    pub fn hotel_id(&self) -> Option<HotelId> {
        self.hotel_id.as_deref()?.trim().parse().ok()
    }
}

/// Unparsable numbers mean "unset", never zero.
fn parse_count(field: &str, raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<u32>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::debug!("ignoring non-numeric {field} filter {raw:?}");
            None
        }
    }
}

/// Speeds are stored as whole Mbps, so a fractional minimum rounds up.
fn parse_min_wifi(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(value) = raw.parse::<u32>() {
        return Some(value);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&value) => {
            Some(value.ceil() as u32)
        }
        _ => {
            log::debug!("ignoring non-numeric min_wifi filter {raw:?}");
            None
        }
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    raw.map(str::trim).is_some_and(|value| {
        ["true", "on", "1", "yes"]
            .iter()
            .any(|accepted| value.eq_ignore_ascii_case(accepted))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> FilterInput {
        FilterInput::default()
    }

    #[test]
    fn empty_input_is_open() {
        assert!(FilterState::from(&input()).is_open());
    }

    #[test]
    fn garbage_numbers_are_unset_not_zero() {
        let state = FilterState::from(&FilterInput {
            min_wifi: Some("fast".to_string()),
            long_stay_max_nights: Some("-3".to_string()),
            ..input()
        });
        assert_eq!(state.min_wifi_mbps(), None);
        assert_eq!(state.long_stay_max_nights(), None);
        assert!(state.is_open());
    }

    #[test]
    fn numbers_tolerate_whitespace() {
        let state = FilterState::from(&FilterInput {
            min_wifi: Some(" 50 ".to_string()),
            ..input()
        });
        assert_eq!(state.min_wifi_mbps(), Some(50));
    }

    #[test]
    fn fractional_wifi_minimum_rounds_up() {
        let wifi = |raw: &str| {
            FilterState::from(&FilterInput {
                min_wifi: Some(raw.to_string()),
                ..input()
            })
            .min_wifi_mbps()
        };
        assert_eq!(wifi("50.5"), Some(51));
        assert_eq!(wifi("50.0"), Some(50));
        assert_eq!(wifi("0.1"), Some(1));
        assert_eq!(wifi("-2.5"), None);
        assert_eq!(wifi("NaN"), None);
    }

    #[test]
    fn checkbox_values() {
        let state = FilterState::from(&FilterInput {
            workspace: Some("on".to_string()),
            coworking_on_site: Some("TRUE".to_string()),
            coworking_nearby: Some("false".to_string()),
            long_stay: Some("".to_string()),
            ..input()
        });
        assert!(state.workspace_required());
        assert!(state.coworking_on_site());
        assert!(!state.coworking_nearby());
        assert!(!state.long_stay_required());
    }

    #[test]
    fn blank_city_clears_filter() {
        let mut state = FilterState::new();
        state.set_city("  Lisbon ");
        assert_eq!(state.city(), Some("Lisbon"));
        state.set_city("   ");
        assert_eq!(state.city(), None);
    }

    #[test]
    fn reset_restores_empty_state() {
        let mut state = FilterState::new();
        state.set_city("Berlin");
        state.set_workspace_required(true);
        state.set_long_stay_max_nights(Some(30));
        state.reset();
        assert!(state.is_open());
    }

    #[test]
    fn deep_link_parsing() {
        let link = DeepLinkParams {
            hotel_id: Some("42".to_string()),
        };
        assert_eq!(link.hotel_id(), Some(42));
        let junk = DeepLinkParams {
            hotel_id: Some("abc".to_string()),
        };
        assert_eq!(junk.hotel_id(), None);
    }
}
