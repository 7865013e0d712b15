//! Rendered-page cache and the revalidation hook actions call after a write

use crate::core::events::{DashboardEvent, EventBus};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Marks a cached route stale so its next request recomputes it.
///
/// Actions call this exactly once after a successful mutation that affects
/// the page at `path`.
pub trait Revalidator: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

/// Revalidator that does nothing, for wiring actions without a cache
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRevalidator;

impl Revalidator for NoopRevalidator {
    fn revalidate_path(&self, _path: &str) {}
}

/// In-process cache of rendered route payloads keyed by path.
///
/// Revalidating a path drops its entry, bumps the path's generation and,
/// when an [`EventBus`] is attached, announces it with
/// [`DashboardEvent::PathRevalidated`]. A page rendered from data read
/// before a revalidation is stored with [`RouteCache::put_if_fresh`] so it
/// never outlives that revalidation.
#[derive(Debug, Default)]
pub struct RouteCache {
    state: RwLock<CacheState>,
    event_bus: Option<EventBus>,
}

#[derive(Debug, Default)]
struct CacheState {
    pages: HashMap<String, Value>,
    generations: HashMap<String, u64>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_bus(event_bus: EventBus) -> Self {
        Self {
            state: RwLock::default(),
            event_bus: Some(event_bus),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached payload for `path`, if still fresh
    pub fn get(&self, path: &str) -> Option<Value> {
        self.read().pages.get(path).cloned()
    }

    /// Number of revalidations `path` has seen; take it before reading the
    /// data a page is rendered from
    pub fn generation(&self, path: &str) -> u64 {
        self.read().generations.get(path).copied().unwrap_or(0)
    }

    pub fn put(&self, path: impl Into<String>, page: Value) {
        self.write().pages.insert(path.into(), page);
    }

    /// Store `page` only if `path` was not revalidated since `generation`.
    ///
    /// Returns whether the page was stored.
    pub fn put_if_fresh(&self, path: &str, generation: u64, page: Value) -> bool {
        let mut state = self.write();
        let current = state.generations.get(path).copied().unwrap_or(0);
        if current != generation {
            tracing::debug!(path = %path, generation, current, "Skipped caching stale page");
            return false;
        }
        state.pages.insert(path.to_string(), page);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.read().pages.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.read().pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Revalidator for RouteCache {
    fn revalidate_path(&self, path: &str) {
        let dropped = {
            let mut state = self.write();
            *state.generations.entry(path.to_string()).or_default() += 1;
            state.pages.remove(path).is_some()
        };

        tracing::debug!(path = %path, dropped, "Revalidated cached route");

        if let Some(bus) = &self.event_bus {
            bus.publish(DashboardEvent::PathRevalidated {
                path: path.to_string(),
            });
        }
    }
}
