//! Shared content with a reload barrier.
//!
//! Evaluations hold a read guard for as long as they use the library.
//! A reload takes the write side, so it waits until every in-flight
//! evaluation has dropped its guard and no evaluation ever sees a
//! half-replaced library.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use crate::error::LockPoisoned;

use super::registry::ContentRegistry;

/// A content registry shared across threads.
#[derive(Clone, Debug, Default)]
pub struct SharedContent {
    inner: Arc<RwLock<ContentRegistry>>,
}

impl SharedContent {
    /// Share a loaded registry.
    pub fn new(registry: ContentRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Lock the library for reading.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, ContentRegistry>, LockPoisoned> {
        self.inner.read().map_err(|_| LockPoisoned)
    }

    /// A cheap copy of the current library.
    pub fn snapshot(&self) -> Result<ContentRegistry, LockPoisoned> {
        Ok(self.read()?.clone())
    }

    /// Replace the library once no evaluation holds it. Returns the old one.
    pub fn reload(&self, registry: ContentRegistry) -> Result<ContentRegistry, LockPoisoned> {
        let mut guard = self.inner.write().map_err(|_| LockPoisoned)?;
        tracing::debug!(
            "Reloading content: {} features, {} spells, {} groups",
            registry.feature_count(),
            registry.spell_count(),
            registry.group_count()
        );
        Ok(std::mem::replace(&mut *guard, registry))
    }

    /// Edit a staged copy and swap it in.
    ///
    /// `edit` runs on a clone outside the lock; readers keep using the
    /// current library until the swap.
    pub fn update(&self, edit: impl FnOnce(&mut ContentRegistry)) -> Result<(), LockPoisoned> {
        let mut staged = self.snapshot()?;
        edit(&mut staged);
        self.reload(staged).map(|_| ())
    }
}
