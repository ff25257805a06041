//! Memoized `VTIMEZONE` components, one per zone.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono_tz::Tz;
use ics_core::Component;

use crate::vtimezone::{build_vtimezone, VTimezoneWindow};

/// Builds each zone's `VTIMEZONE` once and hands out the same `Arc` afterwards.
///
/// The lock is held while a block is built, so two threads asking for the same
/// new zone get one shared block rather than two equal ones.
#[derive(Debug, Default)]
pub struct TimezoneCache {
    window: VTimezoneWindow,
    blocks: Mutex<HashMap<&'static str, Arc<Component>>>,
}

impl TimezoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose blocks cover `window` instead of the default years.
    pub fn with_window(window: VTimezoneWindow) -> Self {
        Self {
            window,
            blocks: Mutex::default(),
        }
    }

    pub fn window(&self) -> VTimezoneWindow {
        self.window
    }

    /// The `VTIMEZONE` for `tz`, built on first request.
    pub fn get_or_build(&self, tz: Tz) -> Arc<Component> {
        let mut blocks = self.lock();
        let block = blocks.entry(tz.name()).or_insert_with(|| {
            tracing::debug!(zone = tz.name(), "building VTIMEZONE");
            Arc::new(build_vtimezone(tz, &self.window))
        });
        Arc::clone(block)
    }

    /// Forget every built block.
    pub fn reset(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<&'static str, Arc<Component>>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.blocks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
