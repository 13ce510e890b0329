//! Process-lifetime descriptor cache.
//!
//! Keyed by type name. Entries are immutable `Arc<TypeDescriptor>`s and are
//! never evicted or rebuilt. The first build of a name runs while holding the
//! map entry, so concurrent callers asking for the same name wait for that
//! build instead of racing it; readers of existing entries only take a shard
//! read lock.

use super::{CACHE_TARGET, query_trace};
use crate::types::TypeDescriptor;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: DashMap<String, Arc<TypeDescriptor>, FxBuildHasher>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached descriptor for `name`, if it has been built.
    pub fn get(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.entries.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Return the cached descriptor for `name`, building and inserting it
    /// with `build` on first use. A failed build inserts nothing.
    pub fn get_or_try_insert_with<E>(
        &self,
        name: &str,
        build: impl FnOnce() -> Result<TypeDescriptor, E>,
    ) -> Result<Arc<TypeDescriptor>, E> {
        if let Some(found) = self.get(name) {
            self.record_hit(name);
            return Ok(found);
        }

        match self.entries.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                self.record_hit(name);
                Ok(Arc::clone(entry.get()))
            }
            Entry::Vacant(entry) => {
                let descriptor = Arc::new(build()?);
                self.misses.fetch_add(1, Ordering::Relaxed);
                query_trace::cache_probe(name, false);
                debug!(
                    target: CACHE_TARGET,
                    type_name = name,
                    methods = descriptor.methods().len(),
                    properties = descriptor.properties().len(),
                    "built descriptor"
                );
                entry.insert(Arc::clone(&descriptor));
                Ok(descriptor)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    #[inline]
    fn record_hit(&self, name: &str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        query_trace::cache_probe(name, true);
    }
}

#[cfg(test)]
#[path = "../../tests/cache_tests.rs"]
mod tests;
