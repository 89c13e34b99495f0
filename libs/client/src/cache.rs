//! Client-local mirror of the server's favorite membership
//!
//! The cache is only ever a view: `reconcile` replaces it wholesale with the
//! ids the server returned, and optimistic edits are rolled back by the
//! caller when the server disagrees.

use std::collections::BTreeSet;

/// Favorite product ids known to the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: BTreeSet<i32>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached membership with the server's list
    pub fn reconcile(&mut self, ids: impl IntoIterator<Item = i32>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn contains(&self, product_id: i32) -> bool {
        self.ids.contains(&product_id)
    }

    /// Returns `true` if the id was not cached before
    pub fn insert(&mut self, product_id: i32) -> bool {
        self.ids.insert(product_id)
    }

    /// Returns `true` if the id was cached
    pub fn remove(&mut self, product_id: i32) -> bool {
        self.ids.remove(&product_id)
    }

    /// Cached ids in ascending order
    pub fn ids(&self) -> Vec<i32> {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Keep only the items whose product id is a favorite, preserving order
    pub fn retain_favorites<T, F>(&self, items: Vec<T>, product_id: F) -> Vec<T>
    where
        F: Fn(&T) -> i32,
    {
        items
            .into_iter()
            .filter(|item| self.contains(product_id(item)))
            .collect()
    }
}

impl FromIterator<i32> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
