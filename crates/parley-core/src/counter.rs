//! Shared count of connected clients.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Count of active sessions. Explicitly owned by the caller and handed to
/// each session at construction — never a process-wide singleton.
#[derive(Clone, Default)]
pub struct ClientCounter(Arc<AtomicUsize>);

impl ClientCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one session. The returned guard gives the slot back when
    /// dropped, so every termination path decrements exactly once.
    pub fn join(&self) -> ClientGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        ClientGuard(self.0.clone())
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// RAII handle for one session's slot in the counter.
pub struct ClientGuard(Arc<AtomicUsize>);

impl Drop for ClientGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
