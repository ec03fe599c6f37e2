//! Field-level differ producing sparse patches.
//!
//! Records are compared as JSON objects. Only the keys of the current record
//! are visited; a key missing from the original counts as changed, while a
//! key present only in the original cannot be expressed in a sparse patch and
//! is ignored.
//!
//! Arrays are compared structurally. By default order matters (`[a, b]` and
//! `[b, a]` differ); fields registered with [`FieldDiffer::unordered`] compare
//! their arrays as multisets instead.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CoreError, Result};

/// Field name to new value, holding only fields that changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    fn insert(&mut self, field: String, value: Value) {
        self.0.insert(field, value);
    }
}

/// Computes [`Patch`]es between two snapshots of the same record.
#[derive(Debug, Clone, Default)]
pub struct FieldDiffer {
    excluded: BTreeSet<String>,
    unordered: BTreeSet<String>,
}

impl FieldDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never report this field, whatever its values.
    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.excluded.insert(field.into());
        self
    }

    pub fn exclude_all<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Compare array values of this field without regard to element order.
    pub fn unordered(mut self, field: impl Into<String>) -> Self {
        self.unordered.insert(field.into());
        self
    }

    pub fn is_excluded(&self, field: &str) -> bool {
        self.excluded.contains(field)
    }

    /// Diff two serializable records of the same shape.
    pub fn diff<T: Serialize>(&self, original: &T, current: &T) -> Result<Patch> {
        let original = serde_json::to_value(original)?;
        let current = serde_json::to_value(current)?;
        self.diff_values(&original, &current)
    }

    pub fn diff_values(&self, original: &Value, current: &Value) -> Result<Patch> {
        let original = as_object(original, "original")?;
        let current = as_object(current, "current")?;

        let mut patch = Patch::new();
        for (field, new_value) in current {
            if self.is_excluded(field) {
                continue;
            }
            let changed = match original.get(field) {
                Some(old_value) => !self.values_equal(field, old_value, new_value),
                None => true,
            };
            if changed {
                patch.insert(field.clone(), new_value.clone());
            }
        }
        Ok(patch)
    }

    fn values_equal(&self, field: &str, old: &Value, new: &Value) -> bool {
        match (old, new) {
            (Value::Array(a), Value::Array(b)) if self.unordered.contains(field) => {
                same_elements(a, b)
            }
            _ => old == new,
        }
    }
}

fn as_object<'a>(value: &'a Value, side: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| CoreError::invalid_entity(format!("{side} snapshot is not an object")))
}

// Multiset equality; arrays here are short (categories, image paths).
fn same_elements(a: &[Value], b: &[Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    for item in a {
        let mut matched = false;
        for (i, candidate) in b.iter().enumerate() {
            if !used[i] && candidate == item {
                used[i] = true;
                matched = true;
                break;
            }
        }
        if !matched {
            return false;
        }
    }
    true
}
