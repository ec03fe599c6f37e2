//! Editable entities and the change sets sent when an edit is submitted.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::catalog::Size;
use crate::diff::{FieldDiffer, Patch};
use crate::error::Result;
use crate::reconcile::{NestedDiff, reconcile};

/// Server-assigned numeric identifier.
pub type EntityId = i64;

/// Wire name of the nested size collection.
pub const SIZES_FIELD: &str = "sizes";

/// A persisted record that can be edited through an [`crate::EditSession`].
pub trait Editable: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human-readable kind, used in logs and errors.
    const KIND: &'static str;

    /// Client-only fields that never reach the server.
    const TRANSIENT_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> EntityId;

    /// The nested size collection, for entities that own one.
    fn sizes(&self) -> Option<&[Size]> {
        None
    }

    /// Reset client-only state, e.g. pending attachments.
    fn clear_transient(&mut self) {}

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Everything that changed between two snapshots of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
    pub fields: Patch,
    /// Present for entities with a nested size collection, even when empty.
    pub sizes: Option<NestedDiff<Size>>,
}

impl ChangeSet {
    pub fn compute<E: Editable>(differ: &FieldDiffer, original: &E, current: &E) -> Result<Self> {
        let differ = differ
            .clone()
            .exclude_all(E::TRANSIENT_FIELDS.iter().copied());

        match (original.sizes(), current.sizes()) {
            (Some(before), Some(after)) => Ok(Self {
                fields: differ.exclude(SIZES_FIELD).diff(original, current)?,
                sizes: Some(reconcile(before, after)),
            }),
            _ => Ok(Self {
                fields: differ.diff(original, current)?,
                sizes: None,
            }),
        }
    }

    /// True when submitting would not change anything on the server.
    pub fn is_noop(&self) -> bool {
        self.fields.is_empty() && self.sizes.as_ref().is_none_or(NestedDiff::is_empty)
    }

    /// JSON body for the update endpoint: `{...fields, "sizes": {added, updated, removed}}`.
    pub fn to_body(&self) -> Result<Value> {
        let mut body = self.fields.clone().into_map();
        if let Some(sizes) = &self.sizes {
            body.insert(SIZES_FIELD.to_string(), serde_json::to_value(sizes)?);
        }
        Ok(Value::Object(body))
    }
}

/// Compute the change set with default comparison rules.
pub fn compute_changes<E: Editable>(original: &E, current: &E) -> Result<ChangeSet> {
    ChangeSet::compute(&FieldDiffer::new(), original, current)
}
