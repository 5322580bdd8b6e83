// Process-wide service lifecycle: Uninitialized -> Ready -> Uninitialized.
//
// The loaded model is a single heavy resource, so exactly zero or one
// ModerationService instance exists at any time. The instance lives in an
// explicitly owned, lock-guarded slot rather than ambient global state;
// `SERVICE` is the one process-wide handle the hosting code consumes.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::{info, warn};

use super::ModerationService;

/// The process-wide service slot used by the server binary.
pub static SERVICE: ServiceHandle = ServiceHandle::new();

/// Lock-guarded slot holding at most one shared [`ModerationService`].
///
/// `initialize` and `cleanup` serialize on the slot's mutex, so two
/// concurrent `initialize` calls can never construct two live instances.
/// The lock is distinct from the rate tracker's.
pub struct ServiceHandle {
    slot: Mutex<Option<Arc<ModerationService>>>,
}

impl ServiceHandle {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the live instance, constructing one with `load` if none exists.
    ///
    /// Idempotent: a second call returns the same `Arc` without invoking the
    /// loader. If the loader fails (model load is long-running and can fail),
    /// no partial instance is retained and the slot stays uninitialized.
    pub fn initialize<F>(&self, load: F) -> Result<Arc<ModerationService>>
    where
        F: FnOnce() -> Result<ModerationService>,
    {
        let mut slot = self.lock();
        if let Some(service) = slot.as_ref() {
            return Ok(Arc::clone(service));
        }

        let service = Arc::new(load()?);
        *slot = Some(Arc::clone(&service));
        info!("moderation service initialized");
        Ok(service)
    }

    /// The live instance, if any.
    pub fn get(&self) -> Option<Arc<ModerationService>> {
        self.lock().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().is_some()
    }

    /// Release the instance. Dropping the last `Arc` frees the classifier
    /// resources. Calling this while uninitialized is a logged no-op, not an
    /// error.
    pub fn cleanup(&self) {
        match self.lock().take() {
            Some(_) => info!("moderation service cleaned up"),
            None => warn!("cleanup called but moderation service is not initialized"),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Arc<ModerationService>>> {
        // Poisoning here would mean a panic inside the loader; the slot
        // itself (an Option) is still coherent.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ServiceHandle {
    fn default() -> Self {
        Self::new()
    }
}
