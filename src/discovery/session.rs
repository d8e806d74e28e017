use serde::Serialize;

use super::filter::{FilterInput, FilterState};
use super::focus::{Focus, FocusCoordinator};
use super::list::{render_list, Action, ListView};
use super::map::{render_markers, MarkerSet, Viewport};
use super::query::{translate, HotelQuery, Scope};
use super::HotelSource;
use crate::error::StoreError;
use crate::models::hotel::{Hotel, HotelId};
use crate::tracking::EventTracker;

/// Non-blocking message shown next to the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notice {
    QueryFailed(String),
}

/// Issued by [`DiscoverySession::begin_query`]; only the latest ticket may render.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTicket {
    generation: u64,
    pub query: HotelQuery,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Rendered {
        hotels: usize,
        markers: usize,
        focus: Option<Focus>,
    },
    /// The fetch failed; the previous render is still in place.
    Failed,
    /// A newer query was issued meanwhile; the response was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Open(String),
    Unavailable,
}

/// Snapshot handed to the drawing adapter.
#[derive(Debug, Serialize)]
pub struct DiscoveryView<'a> {
    pub filter: &'a FilterState,
    pub viewport: Viewport,
    pub markers: &'a MarkerSet,
    pub list: &'a ListView,
    pub focus: Option<&'a Focus>,
    pub notice: Option<&'a Notice>,
}

/// Everything one visitor's discovery page owns: filter, rendered map and list,
/// focus state and the tracking handle.
pub struct DiscoverySession {
    scope: Scope,
    filter: FilterState,
    issued: u64,
    results: Vec<Hotel>,
    markers: MarkerSet,
    list: ListView,
    viewport: Viewport,
    focus: FocusCoordinator,
    notice: Option<Notice>,
    tracker: Option<EventTracker>,
}

impl DiscoverySession {
    pub fn new(scope: Scope, deep_link: Option<HotelId>, tracker: Option<EventTracker>) -> Self {
        Self {
            scope,
            filter: FilterState::new(),
            issued: 0,
            results: Vec::new(),
            markers: MarkerSet::new(),
            list: ListView::default(),
            viewport: Viewport::default(),
            focus: FocusCoordinator::new(deep_link),
            notice: None,
            tracker,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    pub fn apply_input(&mut self, input: &FilterInput) {
        self.filter.apply_input(input);
    }

    pub fn reset_filter(&mut self) {
        self.filter.reset();
    }

    pub fn results(&self) -> &[Hotel] {
        &self.results
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn focused(&self) -> Option<&Focus> {
        self.focus.current()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn begin_query(&mut self) -> QueryTicket {
        self.issued += 1;
        QueryTicket {
            generation: self.issued,
            query: translate(&self.filter, &self.scope),
        }
    }

    /// Applies a fetch result. Map and list are rebuilt from the same result set
    /// and swapped in together; a failure or a stale ticket leaves them untouched.
    pub fn complete_query(
        &mut self,
        ticket: QueryTicket,
        outcome: Result<Vec<Hotel>, StoreError>,
    ) -> Completion {
        if ticket.generation != self.issued {
            log::debug!(
                "dropping response for query {} (latest is {})",
                ticket.generation,
                self.issued
            );
            return Completion::Stale;
        }

        let hotels = match outcome {
            Ok(hotels) => hotels,
            Err(err) => {
                log::error!("Error fetching hotels: {err}");
                self.notice = Some(Notice::QueryFailed(
                    "Hotels could not be loaded. Showing the previous results.".to_string(),
                ));
                return Completion::Failed;
            }
        };

        let map = render_markers(&hotels);
        let list = render_list(&hotels);
        if let Some(viewport) = map.viewport() {
            self.viewport = viewport;
        }
        self.markers = map.markers;
        self.list = list;
        self.results = hotels;
        self.notice = None;

        let focus = self.focus.after_render(&self.markers);
        if let Some(focus) = focus {
            self.viewport = focus.viewport();
            self.track_view(focus.hotel_id);
        }

        Completion::Rendered {
            hotels: self.results.len(),
            markers: self.markers.len(),
            focus,
        }
    }

    pub async fn refresh<S>(&mut self, source: &S) -> Completion
    where
        S: HotelSource + ?Sized,
    {
        let ticket = self.begin_query();
        let outcome = source.fetch(&ticket.query).await;
        self.complete_query(ticket, outcome)
    }

    /// Visitor picked a hotel on the map or in the list.
    pub fn select(&mut self, hotel_id: HotelId) -> Option<Focus> {
        let focus = self.focus.focus(&self.markers, hotel_id)?;
        self.viewport = focus.viewport();
        self.track_view(hotel_id);
        Some(focus)
    }

    /// Visitor activated a booking link. Tracking never holds the link back.
    pub fn open_booking(&mut self, hotel_id: HotelId) -> BookingOutcome {
        let url = self
            .results
            .iter()
            .find(|hotel| hotel.id == hotel_id)
            .and_then(Hotel::booking_url);
        match url {
            Some(url) => {
                let url = url.to_string();
                if let Some(tracker) = &self.tracker {
                    tracker.track_affiliate_click(hotel_id);
                }
                BookingOutcome::Open(url)
            }
            None => BookingOutcome::Unavailable,
        }
    }

    pub fn dispatch(&mut self, action: &Action) -> Option<String> {
        match *action {
            Action::FocusOnMap { hotel_id } => {
                self.select(hotel_id);
                None
            }
            Action::OpenBooking { hotel_id } => match self.open_booking(hotel_id) {
                BookingOutcome::Open(url) => Some(url),
                BookingOutcome::Unavailable => None,
            },
        }
    }

    pub fn view(&self) -> DiscoveryView<'_> {
        DiscoveryView {
            filter: &self.filter,
            viewport: self.viewport,
            markers: &self.markers,
            list: &self.list,
            focus: self.focus.current(),
            notice: self.notice.as_ref(),
        }
    }

    fn track_view(&self, hotel_id: HotelId) {
        if let Some(tracker) = &self.tracker {
            tracker.track_view(hotel_id);
        }
    }
}
