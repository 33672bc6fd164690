//! Main-thread affinity checks for the render context.
//!
//! A [`ThreadGuard`] remembers the thread that owns a render context and, while enforcement is
//! enabled, rejects context operations issued from any other thread. The comparison itself is a
//! read; only rebinding the owner takes the write lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};
use std::thread::{self, ThreadId};

use crate::foundation::error::{GraphicsError, GraphicsResult};

#[derive(Debug)]
pub struct ThreadGuard {
    enabled: AtomicBool,
    owner: RwLock<Option<ThreadId>>,
}

impl ThreadGuard {
    /// Create an unbound guard.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            owner: RwLock::new(None),
        }
    }

    /// Create a guard bound to the calling thread.
    pub fn for_current_thread(enabled: bool) -> Self {
        let guard = Self::new(enabled);
        guard.bind_owner(thread::current().id());
        guard
    }

    /// Turn enforcement on or off.
    pub fn configure(&self, enabled: bool) {
        let prev = self.enabled.swap(enabled, Ordering::AcqRel);
        if prev != enabled {
            tracing::debug!(enabled, "thread guard enforcement changed");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Record `thread` as the owner of the render context.
    pub fn bind_owner(&self, thread: ThreadId) {
        let mut owner = self.owner.write().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(?thread, previous = ?*owner, "thread guard owner bound");
        *owner = Some(thread);
    }

    pub fn owner(&self) -> Option<ThreadId> {
        *self.owner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check the calling thread against the owner.
    ///
    /// Passes when enforcement is disabled or no owner is bound yet.
    pub fn check(&self) -> GraphicsResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        let Some(owner) = self.owner() else {
            return Ok(());
        };
        let caller = thread::current().id();
        if caller == owner {
            return Ok(());
        }
        tracing::warn!(?owner, ?caller, "render context used off its owner thread");
        Err(GraphicsError::ThreadViolation { owner, caller })
    }
}

impl Default for ThreadGuard {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
#[path = "../tests/unit/thread_guard.rs"]
mod tests;
