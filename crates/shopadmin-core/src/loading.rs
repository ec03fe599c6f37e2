//! Request-scoped loading state.
//!
//! Each asynchronous operation holds its own [`LoadingGuard`]; the tracker
//! reports "loading" while at least one guard is alive, so overlapping
//! operations cannot clear each other's state.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Default)]
pub struct LoadingTracker {
    active: Arc<AtomicUsize>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an operation as in flight until the returned guard is dropped.
    #[must_use = "loading ends as soon as the guard is dropped"]
    pub fn begin(&self, operation: &'static str) -> LoadingGuard {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(operation, active, "loading started");
        LoadingGuard {
            active: Arc::clone(&self.active),
            operation,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.active() > 0
    }

    /// Number of operations currently in flight.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct LoadingGuard {
    active: Arc<AtomicUsize>,
    operation: &'static str,
}

impl LoadingGuard {
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let remaining = self.active.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::debug!(operation = self.operation, remaining, "loading finished");
    }
}
