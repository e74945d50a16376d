//! Application-wide loading indicator

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct LoadingState {
    /// Set by hand through `set`/`toggle`
    manual: AtomicBool,
    /// Number of live `LoadingGuard`s
    holds: AtomicUsize,
}

/// Shared loading indicator. Clones observe the same state.
///
/// The indicator is on while it was raised by hand or while any guard from
/// [`hold`](GlobalLoading::hold) is alive.
#[derive(Debug, Clone, Default)]
pub struct GlobalLoading {
    state: Arc<LoadingState>,
}

impl GlobalLoading {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.state.manual.load(Ordering::SeqCst) || self.state.holds.load(Ordering::SeqCst) > 0
    }

    pub fn set(&self, value: bool) {
        self.state.manual.store(value, Ordering::SeqCst);
    }

    pub fn toggle(&self) {
        self.state.manual.fetch_xor(true, Ordering::SeqCst);
    }

    /// Keep the indicator on until the returned guard is dropped
    pub fn hold(&self) -> LoadingGuard {
        self.state.holds.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            state: self.state.clone(),
        }
    }
}

/// Releases one hold on drop
#[must_use = "the hold is released as soon as the guard is dropped"]
pub struct LoadingGuard {
    state: Arc<LoadingState>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.holds.fetch_sub(1, Ordering::SeqCst);
    }
}
