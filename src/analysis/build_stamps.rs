//! Per-component build stamps.
//!
//! A stamp is a counter the builder bumps each time a component is rebuilt.
//! Analysis results remember the stamp they were computed at; a differing
//! current stamp marks them stale. Stamps are advisory only.

use std::sync::Arc;

use rustc_hash::FxHashMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStamps {
    stamps: FxHashMap<Arc<str>, u64>,
}

impl BuildStamps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump the stamp of `component`, returning the new value.
    pub fn increment(&mut self, component: &str) -> u64 {
        let stamp = self.stamps.entry(Arc::from(component)).or_insert(0);
        *stamp += 1;
        *stamp
    }

    /// Current stamp of `component`; 0 if it was never built.
    pub fn stamp(&self, component: &str) -> u64 {
        self.stamps.get(component).copied().unwrap_or(0)
    }

    /// Whether `component` was rebuilt since `seen` was taken.
    pub fn is_stale(&self, component: &str, seen: u64) -> bool {
        self.stamp(component) != seen
    }
}
