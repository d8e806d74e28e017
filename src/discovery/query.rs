use std::cmp::Ordering;

use serde::Serialize;

use super::filter::FilterState;
use crate::models::hotel::{Hotel, HotelStatus};

/// Whose hotels a query may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Public discovery: approved hotels only.
    Public,
    /// An owner's dashboard: every status, own hotels only.
    Owner(String),
    /// Admin moderation: everything.
    Moderation,
}

/// Boolean hotel attributes a filter can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    WorkspaceInRoom,
    CoworkingOnSite,
    CoworkingNearby,
    LongStayPossible,
}

impl Flag {
    pub fn column(self) -> &'static str {
        match self {
            Flag::WorkspaceInRoom => "workspace_in_room",
            Flag::CoworkingOnSite => "coworking_on_site",
            Flag::CoworkingNearby => "coworking_nearby",
            Flag::LongStayPossible => "long_stay_possible",
        }
    }

    pub fn is_set(self, hotel: &Hotel) -> bool {
        match self {
            Flag::WorkspaceInRoom => hotel.workspace_in_room,
            Flag::CoworkingOnSite => hotel.coworking_on_site,
            Flag::CoworkingNearby => hotel.coworking_nearby,
            Flag::LongStayPossible => hotel.long_stay_possible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    StatusIs(HotelStatus),
    OwnedBy(String),
    /// Case-insensitive substring match on the city.
    CityContains(String),
    /// Inclusive minimum. Hotels without a recorded speed never match.
    WifiAtLeast(u32),
    FlagSet(Flag),
    AnyOf(Vec<Predicate>),
    /// Passes hotels that state no minimum stay at all.
    MinNightsAtMost(u32),
}

impl Predicate {
    pub fn matches(&self, hotel: &Hotel) -> bool {
        match self {
            Predicate::StatusIs(status) => hotel.status == *status,
            Predicate::OwnedBy(owner) => hotel.owner_id == *owner,
            Predicate::CityContains(needle) => hotel
                .city
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Predicate::WifiAtLeast(min) => hotel
                .wifi_speed_mbps
                .is_some_and(|speed| speed >= i64::from(*min)),
            Predicate::FlagSet(flag) => flag.is_set(hotel),
            Predicate::AnyOf(options) => options.iter().any(|p| p.matches(hotel)),
            Predicate::MinNightsAtMost(max) => hotel
                .long_stay_min_nights
                .map_or(true, |nights| nights <= i64::from(*max)),
        }
    }
}

/// `created_at` descending, ties broken by ascending id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    NewestFirst,
}

impl SortOrder {
    pub fn compare(self, a: &Hotel, b: &Hotel) -> Ordering {
        match self {
            SortOrder::NewestFirst => b
                .created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelQuery {
    pub predicates: Vec<Predicate>,
    pub order: SortOrder,
}

impl HotelQuery {
    pub fn matches(&self, hotel: &Hotel) -> bool {
        self.predicates.iter().all(|p| p.matches(hotel))
    }

    /// Evaluates the query against an in-memory snapshot.
    pub fn apply<'a>(&self, hotels: impl IntoIterator<Item = &'a Hotel>) -> Vec<Hotel> {
        let mut result: Vec<Hotel> = hotels
            .into_iter()
            .filter(|hotel| self.matches(hotel))
            .cloned()
            .collect();
        result.sort_by(|a, b| self.order.compare(a, b));
        result
    }
}

pub fn translate(filter: &FilterState, scope: &Scope) -> HotelQuery {
    let mut predicates = Vec::new();

    match scope {
        Scope::Public => predicates.push(Predicate::StatusIs(HotelStatus::Approved)),
        Scope::Owner(owner) => predicates.push(Predicate::OwnedBy(owner.clone())),
        Scope::Moderation => {}
    }

    if let Some(city) = filter.city() {
        predicates.push(Predicate::CityContains(city.to_string()));
    }
    if let Some(min) = filter.min_wifi_mbps() {
        predicates.push(Predicate::WifiAtLeast(min));
    }
    if filter.workspace_required() {
        predicates.push(Predicate::FlagSet(Flag::WorkspaceInRoom));
    }

    match (filter.coworking_on_site(), filter.coworking_nearby()) {
        (true, true) => predicates.push(Predicate::AnyOf(vec![
            Predicate::FlagSet(Flag::CoworkingOnSite),
            Predicate::FlagSet(Flag::CoworkingNearby),
        ])),
        (true, false) => predicates.push(Predicate::FlagSet(Flag::CoworkingOnSite)),
        (false, true) => predicates.push(Predicate::FlagSet(Flag::CoworkingNearby)),
        (false, false) => {}
    }

    if filter.long_stay_required() {
        predicates.push(Predicate::FlagSet(Flag::LongStayPossible));
        if let Some(max) = filter.long_stay_max_nights() {
            predicates.push(Predicate::MinNightsAtMost(max));
        }
    }

    HotelQuery {
        predicates,
        order: SortOrder::NewestFirst,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hotel::fixtures::hotel;

    fn ids(hotels: &[Hotel]) -> Vec<i64> {
        hotels.iter().map(|h| h.id).collect()
    }

    #[test]
    fn open_filter_returns_every_approved_hotel() {
        let mut pending = hotel(3, "Porto");
        pending.status = HotelStatus::Pending;
        let fixture = vec![hotel(1, "Berlin"), hotel(2, "London"), pending];

        let query = translate(&FilterState::new(), &Scope::Public);
        assert_eq!(query.predicates, vec![Predicate::StatusIs(HotelStatus::Approved)]);
        assert_eq!(ids(&query.apply(&fixture)), vec![2, 1]);
    }

    #[test]
    fn owner_scope_ignores_status() {
        let mut mine = hotel(1, "Berlin");
        mine.status = HotelStatus::Rejected;
        let mut theirs = hotel(2, "Berlin");
        theirs.owner_id = "owner-2".to_string();

        let query = translate(&FilterState::new(), &Scope::Owner("owner-1".to_string()));
        assert_eq!(ids(&query.apply(&[mine, theirs])), vec![1]);
    }

    #[test]
    fn city_and_workspace() {
        let mut a = hotel(1, "Berlin");
        a.workspace_in_room = true;
        let b = hotel(2, "Berlin");
        let mut c = hotel(3, "London");
        c.workspace_in_room = true;

        let mut filter = FilterState::new();
        filter.set_city("berlin");
        filter.set_workspace_required(true);
        let query = translate(&filter, &Scope::Public);
        assert_eq!(ids(&query.apply(&[a, b, c])), vec![1]);
    }

    #[test]
    fn missing_wifi_never_meets_a_minimum() {
        let mut fast = hotel(1, "Berlin");
        fast.wifi_speed_mbps = Some(100);
        let unknown = hotel(2, "Berlin");

        for min in [0, 1, 100] {
            let mut filter = FilterState::new();
            filter.set_min_wifi_mbps(Some(min));
            let query = translate(&filter, &Scope::Public);
            assert_eq!(ids(&query.apply(&[fast.clone(), unknown.clone()])), vec![1]);
        }

        let mut filter = FilterState::new();
        filter.set_min_wifi_mbps(Some(101));
        assert!(translate(&filter, &Scope::Public).apply(&[fast]).is_empty());
    }

    #[test]
    fn both_coworking_flags_mean_either() {
        let mut on_site = hotel(1, "Berlin");
        on_site.coworking_on_site = true;
        let mut nearby = hotel(2, "Berlin");
        nearby.coworking_nearby = true;
        let neither = hotel(3, "Berlin");
        let fixture = [on_site, nearby, neither];

        let mut filter = FilterState::new();
        filter.set_coworking_on_site(true);
        filter.set_coworking_nearby(true);
        let mut result = ids(&translate(&filter, &Scope::Public).apply(&fixture));
        result.sort_unstable();
        assert_eq!(result, vec![1, 2]);

        filter.set_coworking_nearby(false);
        assert_eq!(ids(&translate(&filter, &Scope::Public).apply(&fixture)), vec![1]);
    }

    #[test]
    fn long_stay_max_keeps_hotels_without_minimum() {
        let mut short = hotel(1, "Berlin");
        short.long_stay_possible = true;
        short.long_stay_min_nights = Some(20);
        let mut long = hotel(2, "Berlin");
        long.long_stay_possible = true;
        long.long_stay_min_nights = Some(45);
        let mut open = hotel(3, "Berlin");
        open.long_stay_possible = true;

        let mut filter = FilterState::new();
        filter.set_long_stay_required(true);
        filter.set_long_stay_max_nights(Some(30));
        let mut result = ids(&translate(&filter, &Scope::Public).apply(&[short, long, open]));
        result.sort_unstable();
        assert_eq!(result, vec![1, 3]);
    }

    #[test]
    fn max_nights_alone_is_ignored() {
        let mut filter = FilterState::new();
        filter.set_long_stay_max_nights(Some(30));
        assert_eq!(
            translate(&filter, &Scope::Moderation).predicates,
            Vec::<Predicate>::new()
        );
    }

    #[test]
    fn ties_on_created_at_break_by_id() {
        let a = hotel(5, "Berlin");
        let mut b = hotel(2, "Berlin");
        let c = hotel(9, "Berlin");
        b.created_at = a.created_at;

        let result = translate(&FilterState::new(), &Scope::Public).apply(&[a, c, b]);
        assert_eq!(ids(&result), vec![9, 2, 5]);
    }
}
