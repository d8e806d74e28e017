//! Hotel discovery engine.
//!
//! A [`session::DiscoverySession`] owns the visitor's filter, translates it into a
//! [`query::HotelQuery`], fetches from a [`HotelSource`] and rebuilds the map
//! markers and list entries from the same result set. Focus and tracking hang off
//! the rendered state.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Serialize, Serializer};

use crate::error::StoreError;
use crate::models::hotel::{Hotel, HotelId};

pub mod filter;
pub mod focus;
pub mod list;
pub mod map;
pub mod query;
pub mod session;

/// Queryable hotel collection. Storage and predicate evaluation live behind it.
#[async_trait]
pub trait HotelSource: Send + Sync {
    async fn fetch(&self, query: &query::HotelQuery) -> Result<Vec<Hotel>, StoreError>;
}

/// Ordered collection with at most one item per hotel id.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedSet<T> {
    items: Vec<T>,
    index: HashMap<HotelId, usize>,
}

impl<T> KeyedSet<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builds the set in iteration order. A repeated id keeps its first position.
    pub fn from_keyed(items: impl IntoIterator<Item = (HotelId, T)>) -> Self {
        let mut set = Self::new();
        for (id, item) in items {
            if set.index.contains_key(&id) {
                continue;
            }
            set.index.insert(id, set.items.len());
            set.items.push(item);
        }
        set
    }

    pub fn get(&self, id: HotelId) -> Option<&T> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    pub fn contains(&self, id: HotelId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = HotelId> + '_ {
        let mut ids: Vec<(usize, HotelId)> = self.index.iter().map(|(&id, &i)| (i, id)).collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id)
    }
}

impl<T> Default for KeyedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> Serialize for KeyedSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_first_duplicate() {
        let set = KeyedSet::from_keyed([(3, "c"), (1, "a"), (3, "dup"), (2, "b")]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(3), Some(&"c"));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(set.ids().collect::<Vec<_>>(), vec![3, 1, 2]);
        assert!(!set.contains(4));
    }
}
