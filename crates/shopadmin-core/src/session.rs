//! Edit sessions for a single entity.
//!
//! ```text
//! Idle -> Loading -> Editing -> Submitting -> Idle      (applied / unchanged)
//!                       ^             |
//!                       +-------------+                 (update failed)
//! ```
//!
//! The session owns the snapshot pair while editing. A failed update puts the
//! session back into `Editing` with the edited copy intact so the caller can
//! retry or cancel.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::diff::FieldDiffer;
use crate::entity::{ChangeSet, Editable, EntityId};
use crate::error::{CoreError, Result};
use crate::loading::LoadingTracker;

/// Persistence collaborator used by [`EditSession`].
#[async_trait]
pub trait EntityStore<E: Editable>: Send + Sync {
    async fn fetch(&self, id: EntityId) -> Result<E>;

    /// Send a change set body produced by [`ChangeSet::to_body`].
    async fn update(&self, id: EntityId, body: &Value) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Loading,
    Editing,
    Submitting,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Editing => write!(f, "editing"),
            Self::Submitting => write!(f, "submitting"),
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Nothing differed from the original; no request was made.
    Unchanged,
    Applied(ChangeSet),
}

#[derive(Debug)]
struct Snapshot<E> {
    original: E,
    current: E,
}

#[derive(Debug)]
enum State<E> {
    Idle,
    Loading,
    Editing(Snapshot<E>),
    Submitting,
}

impl<E> State<E> {
    fn phase(&self) -> SessionPhase {
        match self {
            Self::Idle => SessionPhase::Idle,
            Self::Loading => SessionPhase::Loading,
            Self::Editing(_) => SessionPhase::Editing,
            Self::Submitting => SessionPhase::Submitting,
        }
    }
}

pub struct EditSession<E, S: ?Sized> {
    store: Arc<S>,
    loading: LoadingTracker,
    differ: FieldDiffer,
    state: State<E>,
}

impl<E, S> EditSession<E, S>
where
    E: Editable,
    S: EntityStore<E> + ?Sized,
{
    pub fn new(store: Arc<S>, loading: LoadingTracker) -> Self {
        Self {
            store,
            loading,
            differ: FieldDiffer::new(),
            state: State::Idle,
        }
    }

    /// Replace the comparison rules used on submit.
    pub fn with_differ(mut self, differ: FieldDiffer) -> Self {
        self.differ = differ;
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    /// Fetch the persisted entity and start editing a copy of it.
    pub async fn open(&mut self, id: EntityId) -> Result<&E> {
        self.expect_idle("open")?;
        self.state = State::Loading;
        tracing::debug!(kind = E::KIND, id, "opening edit session");

        let fetched = {
            let _loading = self.loading.begin("fetch");
            self.store.fetch(id).await
        };
        match fetched {
            Ok(original) => {
                self.start(original);
                self.current()
            }
            Err(err) => {
                tracing::warn!(kind = E::KIND, id, error = %err, "failed to load entity");
                self.state = State::Idle;
                Err(err)
            }
        }
    }

    /// Start editing from a snapshot the caller already holds.
    pub fn open_with(&mut self, original: E) -> Result<()> {
        self.expect_idle("open")?;
        self.start(original);
        Ok(())
    }

    pub fn original(&self) -> Result<&E> {
        match &self.state {
            State::Editing(snapshot) => Ok(&snapshot.original),
            other => Err(rejected("read", other.phase())),
        }
    }

    pub fn current(&self) -> Result<&E> {
        match &self.state {
            State::Editing(snapshot) => Ok(&snapshot.current),
            other => Err(rejected("read", other.phase())),
        }
    }

    pub fn current_mut(&mut self) -> Result<&mut E> {
        match &mut self.state {
            State::Editing(snapshot) => Ok(&mut snapshot.current),
            other => Err(rejected("edit", other.phase())),
        }
    }

    /// What a submit would send, without sending it.
    pub fn pending_changes(&self) -> Result<ChangeSet> {
        match &self.state {
            State::Editing(snapshot) => {
                ChangeSet::compute(&self.differ, &snapshot.original, &snapshot.current)
            }
            other => Err(rejected("compute changes", other.phase())),
        }
    }

    /// Abandon the session. The edited copy is discarded without diffing.
    pub fn cancel(&mut self) {
        if !matches!(self.state, State::Idle) {
            tracing::debug!(kind = E::KIND, phase = %self.phase(), "edit session cancelled");
        }
        self.state = State::Idle;
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        let snapshot = match std::mem::replace(&mut self.state, State::Submitting) {
            State::Editing(snapshot) => snapshot,
            other => {
                let phase = other.phase();
                self.state = other;
                return Err(rejected("submit", phase));
            }
        };

        let (changes, body) = match self.prepare(&snapshot) {
            Ok(prepared) => prepared,
            Err(err) => {
                self.state = State::Editing(snapshot);
                return Err(err);
            }
        };

        let id = snapshot.original.id();
        if changes.is_noop() {
            tracing::info!(kind = E::KIND, id, "no changes to submit");
            self.state = State::Idle;
            return Ok(SubmitOutcome::Unchanged);
        }

        let result = {
            let _loading = self.loading.begin("submit");
            self.store.update(id, &body).await
        };
        match result {
            Ok(()) => {
                tracing::info!(
                    kind = E::KIND,
                    id,
                    fields = changes.fields.len(),
                    "changes applied"
                );
                self.state = State::Idle;
                Ok(SubmitOutcome::Applied(changes))
            }
            Err(err) => {
                tracing::warn!(kind = E::KIND, id, error = %err, "update failed, edits kept");
                self.state = State::Editing(snapshot);
                Err(err)
            }
        }
    }

    fn prepare(&self, snapshot: &Snapshot<E>) -> Result<(ChangeSet, Value)> {
        snapshot.current.validate()?;
        let changes = ChangeSet::compute(&self.differ, &snapshot.original, &snapshot.current)?;
        let body = changes.to_body()?;
        Ok((changes, body))
    }

    fn start(&mut self, original: E) {
        let mut current = original.clone();
        current.clear_transient();
        tracing::debug!(kind = E::KIND, id = original.id(), "editing");
        self.state = State::Editing(Snapshot { original, current });
    }

    fn expect_idle(&self, action: &str) -> Result<()> {
        match self.state {
            State::Idle => Ok(()),
            ref other => Err(rejected(action, other.phase())),
        }
    }
}

fn rejected(action: &str, phase: SessionPhase) -> CoreError {
    CoreError::invalid_transition(action, format!("session is {phase}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Size, Version};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct MemoryStore {
        versions: Mutex<HashMap<EntityId, Version>>,
        updates: Mutex<Vec<(EntityId, Value)>>,
        fail_updates: AtomicBool,
        loading: LoadingTracker,
        saw_loading: AtomicBool,
    }

    impl MemoryStore {
        fn with(version: Version, loading: LoadingTracker) -> Self {
            let store = Self {
                loading,
                ..Self::default()
            };
            store.versions.lock().unwrap().insert(version.id, version);
            store
        }

        fn updates(&self) -> Vec<(EntityId, Value)> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EntityStore<Version> for MemoryStore {
        async fn fetch(&self, id: EntityId) -> Result<Version> {
            self.versions
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| CoreError::not_found("version", id))
        }

        async fn update(&self, id: EntityId, body: &Value) -> Result<()> {
            self.saw_loading
                .store(self.loading.is_loading(), Ordering::SeqCst);
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(CoreError::network("HTTP 500: database unavailable"));
            }
            self.updates.lock().unwrap().push((id, body.clone()));
            Ok(())
        }
    }

    fn version() -> Version {
        Version {
            id: 9,
            product_id: 2,
            style: "Navy".into(),
            sold: 1,
            stock: 3,
            images: vec!["/img/navy.png".into()],
            file_images: Vec::new(),
            image_news: Vec::new(),
            sizes: vec![Size::new("S", 2), Size::new("M", 1)],
        }
    }

    fn session(store: &Arc<MemoryStore>, loading: &LoadingTracker) -> EditSession<Version, MemoryStore> {
        EditSession::new(Arc::clone(store), loading.clone())
    }

    #[tokio::test]
    async fn edit_and_submit_sends_change_set() {
        let loading = LoadingTracker::new();
        let store = Arc::new(MemoryStore::with(version(), loading.clone()));
        let mut session = session(&store, &loading);

        session.open(9).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Editing);
        {
            let current = session.current_mut().unwrap();
            current.style = "Midnight".into();
            current.remove_size("M").unwrap();
            current.add_size("L", 5).unwrap();
        }

        let outcome = session.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Applied(_)));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(store.saw_loading.load(Ordering::SeqCst));
        assert!(!loading.is_loading());

        assert_eq!(
            store.updates(),
            vec![(
                9,
                json!({
                    "style": "Midnight",
                    "sizes": {
                        "added": [{"size": "L", "quantity": 5}],
                        "updated": [],
                        "removed": [{"size": "M", "quantity": 1}]
                    }
                })
            )]
        );
    }

    #[tokio::test]
    async fn failed_update_keeps_edits_for_retry() {
        let loading = LoadingTracker::new();
        let store = Arc::new(MemoryStore::with(version(), loading.clone()));
        store.fail_updates.store(true, Ordering::SeqCst);
        let mut session = session(&store, &loading);

        session.open(9).await.unwrap();
        session.current_mut().unwrap().set_size_quantity("S", 9).unwrap();

        let err = session.submit().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(session.phase(), SessionPhase::Editing);
        assert_eq!(session.current().unwrap().size("S"), Some(&Size::new("S", 9)));
        assert!(!loading.is_loading());

        store.fail_updates.store(false, Ordering::SeqCst);
        session.submit().await.unwrap();
        let updates = store.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(
            updates[0].1["sizes"]["updated"],
            json!([{"size": "S", "quantity": 9}])
        );
    }

    #[tokio::test]
    async fn unchanged_submit_skips_the_store() {
        let loading = LoadingTracker::new();
        let store = Arc::new(MemoryStore::with(version(), loading.clone()));
        let mut session = session(&store, &loading);

        session.open(9).await.unwrap();
        let outcome = session.submit().await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Unchanged));
        assert!(store.updates().is_empty());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn validation_failure_stays_editing() {
        let loading = LoadingTracker::new();
        let store = Arc::new(MemoryStore::with(version(), loading.clone()));
        let mut session = session(&store, &loading);

        session.open(9).await.unwrap();
        session.current_mut().unwrap().style.clear();

        let err = session.submit().await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(session.phase(), SessionPhase::Editing);
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_returns_to_idle() {
        let loading = LoadingTracker::new();
        let store = Arc::new(MemoryStore::with(version(), loading.clone()));
        let mut session = session(&store, &loading);

        let err = session.open(404).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(!loading.is_loading());
    }

    #[tokio::test]
    async fn operations_outside_editing_are_rejected() {
        let loading = LoadingTracker::new();
        let store = Arc::new(MemoryStore::with(version(), loading.clone()));
        let mut session = session(&store, &loading);

        assert!(matches!(
            session.submit().await,
            Err(CoreError::InvalidTransition { .. })
        ));
        assert!(session.current_mut().is_err());
        assert!(session.pending_changes().is_err());
        assert_eq!(session.phase(), SessionPhase::Idle);

        session.open(9).await.unwrap();
        let err = session.open(9).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot open while session is editing");
    }

    #[tokio::test]
    async fn cancel_discards_edits() {
        let loading = LoadingTracker::new();
        let store = Arc::new(MemoryStore::with(version(), loading.clone()));
        let mut session = session(&store, &loading);

        session.open_with(version()).unwrap();
        session.current_mut().unwrap().stock = 100;
        assert!(!session.pending_changes().unwrap().is_noop());

        session.cancel();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.current().is_err());
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn opening_clears_transient_attachments() {
        let loading = LoadingTracker::new();
        let mut stored = version();
        stored.file_images = vec!["/tmp/stale.png".into()];
        stored.image_news = vec!["data:image/png;base64,AAAA".into()];
        let store = Arc::new(MemoryStore::with(stored, loading.clone()));
        let mut session = session(&store, &loading);

        let current = session.open(9).await.unwrap();
        assert!(current.file_images.is_empty());
        assert!(current.image_news.is_empty());
        assert_eq!(session.original().unwrap().file_images.len(), 1);
    }
}
