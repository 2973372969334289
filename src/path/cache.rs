//! Parsed path cache
//!
//! Documents often repeat the same `d` string (icons, `use` targets,
//! markers). The cache keys parsed geometry by the raw attribute bytes and
//! hands out shared `Arc`s, evicting least recently used entries.

use super::parser::parse_path_data;
use super::segment::PathData;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::trace;

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hits as a percentage of lookups
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}

pub struct PathCache {
    entries: LruCache<Box<[u8]>, Arc<PathData>>,
    stats: CacheStats,
}

impl PathCache {
    /// Cache holding at most `capacity` parsed paths (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { entries: LruCache::new(capacity), stats: CacheStats::default() }
    }

    /// Parsed form of `d`, parsing on first sight
    pub fn get_or_parse(&mut self, d: &[u8]) -> Arc<PathData> {
        if let Some(hit) = self.entries.get(d) {
            self.stats.hits += 1;
            return Arc::clone(hit);
        }
        self.stats.misses += 1;
        let parsed = Arc::new(parse_path_data(d));
        trace!(len = d.len(), subpaths = parsed.len(), "path cached");
        self.entries.put(d.into(), Arc::clone(&parsed));
        parsed
    }

    pub fn contains(&self, d: &[u8]) -> bool {
        self.entries.contains(d)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(256)
    }
}
