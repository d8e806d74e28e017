use serde::Serialize;

use super::map::{LatLng, MarkerSet, Viewport, FOCUS_ZOOM};
use crate::models::hotel::HotelId;

/// Map and list instructions for a focused hotel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Focus {
    pub hotel_id: HotelId,
    pub center: LatLng,
    pub zoom: u8,
    /// Marker whose popup is opened.
    pub open_popup: HotelId,
    /// List entry scrolled into view and highlighted.
    pub scroll_to: HotelId,
}

impl Focus {
    pub fn viewport(&self) -> Viewport {
        Viewport::Centered {
            center: self.center,
            zoom: self.zoom,
        }
    }
}

/// Keeps map selection and list highlight pointing at the same hotel.
#[derive(Debug, Default)]
pub struct FocusCoordinator {
    deep_link: Option<HotelId>,
    current: Option<Focus>,
}

impl FocusCoordinator {
    pub fn new(deep_link: Option<HotelId>) -> Self {
        Self {
            deep_link,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Focus> {
        self.current.as_ref()
    }

    pub fn has_pending_deep_link(&self) -> bool {
        self.deep_link.is_some()
    }

    /// Focuses a hotel present in `markers`. Unknown ids change nothing.
    pub fn focus(&mut self, markers: &MarkerSet, hotel_id: HotelId) -> Option<Focus> {
        let marker = markers.get(hotel_id)?;
        let focus = Focus {
            hotel_id,
            center: marker.position,
            zoom: FOCUS_ZOOM,
            open_popup: hotel_id,
            scroll_to: hotel_id,
        };
        self.current = Some(focus);
        Some(focus)
    }

    /// Runs after every successful render. The deep link is consumed by the
    /// first call whether or not its hotel made it into the result.
    pub fn after_render(&mut self, markers: &MarkerSet) -> Option<Focus> {
        if self
            .current
            .is_some_and(|focus| !markers.contains(focus.hotel_id))
        {
            self.current = None;
        }

        let target = self.deep_link.take()?;
        let focus = self.focus(markers, target);
        if focus.is_none() {
            log::debug!("deep-linked hotel {target} is not on the map, skipping focus");
        }
        focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::map::render_markers;
    use crate::models::hotel::fixtures::hotel;

    #[test]
    fn focusing_an_unknown_hotel_is_a_noop() {
        let markers = render_markers(&[hotel(1, "Berlin")]).markers;
        let mut coordinator = FocusCoordinator::new(None);
        assert_eq!(coordinator.focus(&markers, 99), None);
        assert_eq!(coordinator.current(), None);
    }

    #[test]
    fn focus_centers_on_marker_at_close_zoom() {
        let markers = render_markers(&[hotel(1, "Berlin")]).markers;
        let mut coordinator = FocusCoordinator::new(None);
        let focus = coordinator.focus(&markers, 1).unwrap();
        assert_eq!(focus.zoom, FOCUS_ZOOM);
        assert_eq!(focus.center, LatLng { lat: 52.52, lng: 13.405 });
        assert_eq!(focus.open_popup, 1);
        assert_eq!(focus.scroll_to, 1);
    }

    #[test]
    fn deep_link_applies_exactly_once() {
        let markers = render_markers(&[hotel(1, "Berlin"), hotel(2, "Berlin")]).markers;
        let mut coordinator = FocusCoordinator::new(Some(2));
        assert!(coordinator.has_pending_deep_link());
        assert_eq!(coordinator.after_render(&markers).map(|f| f.hotel_id), Some(2));
        assert!(!coordinator.has_pending_deep_link());
        assert_eq!(coordinator.after_render(&markers), None);
    }

    #[test]
    fn missing_deep_link_target_is_dropped_silently() {
        let markers = render_markers(&[hotel(1, "Berlin")]).markers;
        let mut coordinator = FocusCoordinator::new(Some(7));
        assert_eq!(coordinator.after_render(&markers), None);
        assert!(!coordinator.has_pending_deep_link());
    }

    #[test]
    fn stale_selection_is_cleared_on_rerender() {
        let mut coordinator = FocusCoordinator::new(None);
        let before = render_markers(&[hotel(1, "Berlin")]).markers;
        coordinator.focus(&before, 1);
        let after = render_markers(&[hotel(2, "Berlin")]).markers;
        coordinator.after_render(&after);
        assert_eq!(coordinator.current(), None);
    }
}
