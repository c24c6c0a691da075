//! Bounded cache for header name canonicalization.
//!
//! Maps raw header names to their canonical form so hot request paths skip
//! recomputation. Eviction is oldest-inserted first. The cache is owned by a
//! single service instance and is not synchronized; share it only behind an
//! external lock.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

/// Default maximum number of cached names.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 1000;

/// Point-in-time cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub cache_size: usize,
    pub max_cache_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub hit_rate_percent: f64,
}

impl CacheStats {
    /// Total lookups since the counters were last reset.
    #[inline]
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fill ratio in percent (0 when the cache has no capacity).
    pub fn fill_percent(&self) -> f64 {
        if self.max_cache_size == 0 {
            0.0
        } else {
            self.cache_size as f64 / self.max_cache_size as f64 * 100.0
        }
    }
}

/// FIFO-bounded map from raw header name to canonical name.
#[derive(Debug)]
pub struct NameCache {
    /// raw name -> canonical name
    entries: HashMap<Box<str>, Box<str>>,
    /// Insertion order: oldest at front
    order: VecDeque<Box<str>>,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl NameCache {
    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CACHE_SIZE)
    }

    /// Create a cache holding at most `capacity` names.
    pub fn with_capacity(capacity: usize) -> Self {
        // Cap the up-front allocation; large limits grow on demand
        let initial = capacity.min(256);
        Self {
            entries: HashMap::with_capacity(initial),
            order: VecDeque::with_capacity(initial),
            capacity,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up a raw name, counting a hit or a miss.
    #[inline]
    pub fn lookup(&mut self, raw: &str) -> Option<&str> {
        match self.entries.get(raw) {
            Some(canonical) => {
                self.hits += 1;
                Some(&**canonical)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Count a miss without consulting the map (used when caching is disabled).
    #[inline]
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Peek without touching the counters.
    #[inline]
    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(|c| &**c)
    }

    #[inline]
    pub fn contains(&self, raw: &str) -> bool {
        self.entries.contains_key(raw)
    }

    /// Insert a name, evicting the oldest entry when full.
    pub fn insert(&mut self, raw: &str, canonical: &str) {
        if self.capacity == 0 || self.entries.contains_key(raw) {
            return;
        }

        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                self.evictions += 1;
            }
        }

        let key: Box<str> = raw.into();
        self.entries.insert(key.clone(), canonical.into());
        self.order.push_back(key);
    }

    /// Insert only if there is free room. Never evicts.
    ///
    /// Returns true when a new entry was stored.
    pub fn insert_if_room(&mut self, raw: &str, canonical: &str) -> bool {
        if self.order.len() >= self.capacity || self.entries.contains_key(raw) {
            return false;
        }
        self.insert(raw, canonical);
        true
    }

    /// Drop all entries and reset every counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        let lookups = self.hits + self.misses;
        let hit_rate_percent = if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64 * 100.0
        };
        CacheStats {
            cache_size: self.entries.len(),
            max_cache_size: self.capacity,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            hit_rate_percent,
        }
    }
}

impl Default for NameCache {
    fn default() -> Self {
        Self::new()
    }
}
