//! Index-buffer caching for the tessellators.
//!
//! Sphere and grid index lists depend only on their resolution, never on
//! positions, so every body in a scene can share one buffer per resolution.
//!
//! # Example
//! ```ignore
//! let mut cache = GeomCache::default();
//! let indices = cache.get_or_insert_sphere_indices(30, 30, || build(30, 30));
//! assert_eq!(cache.stats().sphere_index_misses, 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SphereIndexKey {
    lat_bands: u32,
    lon_bands: u32,
}

/// Shared buffer for cached index data (avoids cloning on every access).
type SharedIndices = Arc<Vec<u32>>;

#[derive(Debug, Default)]
pub struct GeomCache {
    sphere_indices: HashMap<SphereIndexKey, SharedIndices>,
    grid_indices: HashMap<u32, SharedIndices>,

    sphere_index_hits: usize,
    sphere_index_misses: usize,
    grid_index_hits: usize,
    grid_index_misses: usize,
}

/// Cache statistics for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeomCacheStats {
    pub sphere_index_entries: usize,
    pub grid_index_entries: usize,
    pub sphere_index_hits: usize,
    pub sphere_index_misses: usize,
    pub grid_index_hits: usize,
    pub grid_index_misses: usize,
    /// Estimated memory held by cached buffers, in bytes.
    pub estimated_memory_bytes: usize,
}

impl GeomCacheStats {
    #[must_use]
    pub const fn total_entries(&self) -> usize {
        self.sphere_index_entries + self.grid_index_entries
    }

    #[must_use]
    pub const fn total_hits(&self) -> usize {
        self.sphere_index_hits + self.grid_index_hits
    }

    #[must_use]
    pub const fn total_misses(&self) -> usize {
        self.sphere_index_misses + self.grid_index_misses
    }

    /// Returns the cache hit rate in `[0, 1]`; 0 before any access.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_hits() + self.total_misses();
        if total == 0 {
            0.0
        } else {
            self.total_hits() as f64 / total as f64
        }
    }
}

impl GeomCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self) -> GeomCacheStats {
        GeomCacheStats {
            sphere_index_entries: self.sphere_indices.len(),
            grid_index_entries: self.grid_indices.len(),
            sphere_index_hits: self.sphere_index_hits,
            sphere_index_misses: self.sphere_index_misses,
            grid_index_hits: self.grid_index_hits,
            grid_index_misses: self.grid_index_misses,
            estimated_memory_bytes: self.estimate_memory_usage(),
        }
    }

    /// Clears all cached data and resets hit/miss counters.
    pub fn clear(&mut self) {
        self.sphere_indices.clear();
        self.grid_indices.clear();
        self.reset_counters();
    }

    pub fn reset_counters(&mut self) {
        self.sphere_index_hits = 0;
        self.sphere_index_misses = 0;
        self.grid_index_hits = 0;
        self.grid_index_misses = 0;
    }

    #[must_use]
    pub fn estimate_memory_usage(&self) -> usize {
        let indices: usize = self
            .sphere_indices
            .values()
            .chain(self.grid_indices.values())
            .map(|buf| buf.len() * std::mem::size_of::<u32>())
            .sum();
        let entry_overhead = std::mem::size_of::<(SphereIndexKey, SharedIndices)>();
        indices + (self.sphere_indices.len() + self.grid_indices.len()) * entry_overhead
    }

    /// Returns the shared sphere index buffer for `(lat_bands, lon_bands)`,
    /// calling `make` only on the first request.
    pub fn get_or_insert_sphere_indices(
        &mut self,
        lat_bands: u32,
        lon_bands: u32,
        make: impl FnOnce() -> Vec<u32>,
    ) -> SharedIndices {
        let key = SphereIndexKey {
            lat_bands,
            lon_bands,
        };
        if let Some(cached) = self.sphere_indices.get(&key) {
            self.sphere_index_hits += 1;
            return Arc::clone(cached);
        }
        self.sphere_index_misses += 1;
        log::debug!("sphere index cache miss for {lat_bands}x{lon_bands}");
        let indices = Arc::new(make());
        self.sphere_indices.insert(key, Arc::clone(&indices));
        indices
    }

    /// Returns the shared surface-grid index buffer for resolution `k`.
    pub fn get_or_insert_grid_indices(
        &mut self,
        resolution: u32,
        make: impl FnOnce() -> Vec<u32>,
    ) -> SharedIndices {
        if let Some(cached) = self.grid_indices.get(&resolution) {
            self.grid_index_hits += 1;
            return Arc::clone(cached);
        }
        self.grid_index_misses += 1;
        log::debug!("grid index cache miss for k = {resolution}");
        let indices = Arc::new(make());
        self.grid_indices.insert(resolution, Arc::clone(&indices));
        indices
    }

    #[must_use]
    pub fn has_sphere_indices(&self, lat_bands: u32, lon_bands: u32) -> bool {
        self.sphere_indices.contains_key(&SphereIndexKey {
            lat_bands,
            lon_bands,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_indices_are_shared_per_resolution() {
        let mut cache = GeomCache::new();
        let a = cache.get_or_insert_sphere_indices(2, 3, || vec![0, 1, 2]);
        let b = cache.get_or_insert_sphere_indices(2, 3, || unreachable!("cached"));
        assert!(Arc::ptr_eq(&a, &b));
        let _ = cache.get_or_insert_sphere_indices(3, 2, || vec![2, 1, 0]);

        let stats = cache.stats();
        assert_eq!(stats.sphere_index_entries, 2);
        assert_eq!(stats.sphere_index_hits, 1);
        assert_eq!(stats.sphere_index_misses, 2);
        assert!(cache.has_sphere_indices(3, 2));
    }

    #[test]
    fn clear_drops_entries_and_counters() {
        let mut cache = GeomCache::new();
        let _ = cache.get_or_insert_grid_indices(4, || vec![0; 6]);
        let _ = cache.get_or_insert_grid_indices(4, Vec::new);
        assert!((cache.stats().hit_rate() - 0.5).abs() < 1e-12);
        assert!(cache.estimate_memory_usage() >= 24);

        cache.clear();
        assert_eq!(cache.stats(), GeomCacheStats::default());
    }
}
