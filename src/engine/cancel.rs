//! Cooperative cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag observed by the enumeration loop between records.
///
/// Clones share the same flag. The flag stays set until [`reset`](Self::reset)
/// is called.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    requested: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the running enumeration stop. Idempotent.
    pub fn cancel(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Re-arm the token for another enumeration
    pub fn reset(&self) {
        self.requested.store(false, Ordering::Release);
    }
}
