use serde::{Serialize, Serializer};

use super::KeyedSet;
use crate::models::hotel::{Hotel, HotelId};

/// Padding (px) around the markers when fitting the viewport to them.
pub const FIT_PADDING: u32 = 40;
/// Zoom level used when a single hotel is focused.
pub const FOCUS_ZOOM: u8 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    fn around(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Viewport {
    Centered { center: LatLng, zoom: u8 },
    Fitted { bounds: Bounds, padding: u32 },
}

impl Default for Viewport {
    /// World view.
    fn default() -> Self {
        Viewport::Centered {
            center: LatLng { lat: 20.0, lng: 0.0 },
            zoom: 2,
        }
    }
}

/// Remote-work feature shown as a badge on markers and list rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    WorkspaceInRoom,
    CoworkingOnSite,
    CoworkingNearby,
    LongStay,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::WorkspaceInRoom => "Workspace in room",
            Badge::CoworkingOnSite => "Coworking on site",
            Badge::CoworkingNearby => "Coworking nearby",
            Badge::LongStay => "Long stays possible",
        }
    }

    pub fn for_hotel(hotel: &Hotel) -> Vec<Badge> {
        [
            (hotel.workspace_in_room, Badge::WorkspaceInRoom),
            (hotel.coworking_on_site, Badge::CoworkingOnSite),
            (hotel.coworking_nearby, Badge::CoworkingNearby),
            (hotel.long_stay_possible, Badge::LongStay),
        ]
        .into_iter()
        .filter_map(|(set, badge)| set.then_some(badge))
        .collect()
    }
}

impl Serialize for Badge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// What a marker popup and a list row have in common.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelSummary {
    pub name: String,
    pub location: String,
    pub badges: Vec<Badge>,
    pub wifi_speed_mbps: Option<i64>,
    pub booking_url: Option<String>,
}

impl HotelSummary {
    pub fn of(hotel: &Hotel) -> Self {
        Self {
            name: hotel.name.clone(),
            location: format!("{}, {}", hotel.city, hotel.country),
            badges: Badge::for_hotel(hotel),
            wifi_speed_mbps: hotel.wifi_speed_mbps,
            booking_url: hotel.booking_url().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub hotel_id: HotelId,
    pub position: LatLng,
    pub popup: HotelSummary,
}

pub type MarkerSet = KeyedSet<Marker>;

#[derive(Debug, Clone, PartialEq)]
pub struct MapRender {
    pub markers: MarkerSet,
    /// `None` when no hotel had coordinates; the viewport is then left alone.
    pub fit: Option<Bounds>,
}

impl MapRender {
    pub fn viewport(&self) -> Option<Viewport> {
        self.fit.map(|bounds| Viewport::Fitted {
            bounds,
            padding: FIT_PADDING,
        })
    }
}

/// One marker per hotel that has both coordinates, in result order.
pub fn render_markers(hotels: &[Hotel]) -> MapRender {
    let mut fit: Option<Bounds> = None;
    let markers = MarkerSet::from_keyed(hotels.iter().filter_map(|hotel| {
        let (lat, lng) = hotel.coordinates()?;
        let position = LatLng { lat, lng };
        match fit.as_mut() {
            Some(bounds) => bounds.extend(position),
            None => fit = Some(Bounds::around(position)),
        }
        Some((
            hotel.id,
            Marker {
                hotel_id: hotel.id,
                position,
                popup: HotelSummary::of(hotel),
            },
        ))
    }));
    MapRender { markers, fit }
}
