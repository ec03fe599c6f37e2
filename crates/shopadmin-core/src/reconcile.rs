//! Reconciliation of keyed nested collections.
//!
//! Given the persisted items and the edited items of a collection, produce
//! the three-way partition the update endpoints expect: items to add, items
//! whose payload changed, and items to remove. Items present on both sides
//! with equal payload appear nowhere.
//!
//! Output order follows the edited items for `added` / `updated` and the
//! persisted items for `removed`. Nothing is sorted here.
//!
//! When a key occurs more than once on one side, the last occurrence wins and
//! takes the position of the first one. [`reconcile_strict`] rejects
//! duplicate keys in the edited items instead.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// An element of a nested collection identified by a key field.
pub trait KeyedItem: Clone + PartialEq {
    type Key: Eq + Hash + Clone + Display;

    fn key(&self) -> Self::Key;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedDiff<T> {
    pub added: Vec<T>,
    pub updated: Vec<T>,
    pub removed: Vec<T>,
}

impl<T> Default for NestedDiff<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            updated: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<T> NestedDiff<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    /// Number of items across all three lists.
    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}

pub fn reconcile<T: KeyedItem>(original: &[T], current: &[T]) -> NestedDiff<T> {
    let mut lookup = index_by_key(original);
    let mut diff = NestedDiff::default();

    for (key, item) in index_by_key(current) {
        match lookup.shift_remove(&key) {
            None => diff.added.push(item.clone()),
            Some(previous) if previous == item => {}
            Some(_) => diff.updated.push(item.clone()),
        }
    }
    diff.removed = lookup.into_values().cloned().collect();

    tracing::debug!(
        added = diff.added.len(),
        updated = diff.updated.len(),
        removed = diff.removed.len(),
        "reconciled nested collection"
    );
    diff
}

/// Like [`reconcile`], but duplicate keys in `current` are an error.
pub fn reconcile_strict<T: KeyedItem>(
    original: &[T],
    current: &[T],
    collection: &str,
) -> Result<NestedDiff<T>> {
    if let Some(key) = first_duplicate(current) {
        return Err(CoreError::duplicate_key(collection, key.to_string()));
    }
    Ok(reconcile(original, current))
}

pub fn first_duplicate<T: KeyedItem>(items: &[T]) -> Option<T::Key> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(|item| item.key())
        .find(|key| !seen.insert(key.clone()))
}

fn index_by_key<T: KeyedItem>(items: &[T]) -> IndexMap<T::Key, &T> {
    let mut map = IndexMap::with_capacity(items.len());
    for item in items {
        map.insert(item.key(), item);
    }
    map
}
