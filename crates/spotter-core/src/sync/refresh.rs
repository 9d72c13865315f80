//! Guard against applying refetch results that arrive too late

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Result of a guarded refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome<T> {
    /// The response was current and has been applied
    Applied(T),
    /// A newer refresh started, or the view went away, before this one finished
    Stale,
}

impl<T> RefreshOutcome<T> {
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Stale => None,
        }
    }
}

/// Issued when a refresh starts; checked before its result is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

#[derive(Debug)]
struct GuardState {
    generation: AtomicU64,
    mounted: AtomicBool,
}

/// Tracks the latest refresh of one view.
///
/// Only the most recently started refresh may apply its result, and nothing
/// applies after [`RefreshGuard::unmount`].
#[derive(Debug, Clone)]
pub struct RefreshGuard {
    state: Arc<GuardState>,
}

impl Default for RefreshGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshGuard {
    pub fn new() -> Self {
        Self {
            state: Arc::new(GuardState {
                generation: AtomicU64::new(0),
                mounted: AtomicBool::new(true),
            }),
        }
    }

    pub fn begin(&self) -> RefreshTicket {
        let generation = self.state.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RefreshTicket { generation }
    }

    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        self.state.mounted.load(Ordering::SeqCst)
            && self.state.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Stop accepting results, e.g. when the owning view is torn down
    pub fn unmount(&self) {
        self.state.mounted.store(false, Ordering::SeqCst);
    }

    pub fn mount(&self) {
        self.state.mounted.store(true, Ordering::SeqCst);
    }
}
